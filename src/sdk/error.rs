use std::fmt;

#[derive(Debug)]
pub enum DeadmanError {
    InvalidInput(String),
    Descriptor(String),
    Rpc(String),
    InsufficientFunds { needed: u64, available: u64 },
    DustRejected,
    Submit(String),
    Io(String),
}

impl fmt::Display for DeadmanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(e) => write!(f, "invalid input: {e}"),
            Self::Descriptor(e) => write!(f, "contract descriptor error: {e}"),
            Self::Rpc(e) => write!(f, "RPC error: {e}"),
            Self::InsufficientFunds { needed, available } => {
                write!(
                    f,
                    "insufficient funds: need {needed} sompi, have {available}"
                )
            }
            Self::DustRejected => {
                write!(
                    f,
                    "transaction rejected (dust), try sending all funds instead"
                )
            }
            Self::Submit(e) => write!(f, "submission failed: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for DeadmanError {}

impl From<std::io::Error> for DeadmanError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(format!("{e}"))
    }
}
