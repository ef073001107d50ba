pub mod contract;
pub mod error;
pub mod script;
pub mod signer;
pub mod tx;

pub use contract::ContractDescriptor;
pub use error::DeadmanError;
pub use signer::{SchnorrSigner, ScriptSigner};
pub use tx::{TxRecord, UtxoRef};
