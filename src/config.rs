//! Endpoint and fee configuration.
//!
//! The source workflows disagreed on fee amounts and on whether the REST
//! indexer or the node wRPC endpoint is authoritative for UTXOs, so
//! neither is hard-coded: every bin takes these as overridable settings
//! and the claim pipeline uses whichever client the caller hands it.

use kaspa_addresses::Prefix;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://api-tn12.kaspa.org";
pub const DEFAULT_WRPC_URL: &str = "ws://127.0.0.1:18210";
pub const DEFAULT_SUBMIT_URL: &str = "http://localhost:3001/api/rpc";
pub const DEFAULT_FEE: u64 = 1_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base: String,
    pub wrpc_url: String,
    pub submit_url: String,
    /// Flat fee in sompi.
    pub fee: u64,
    pub network: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            wrpc_url: DEFAULT_WRPC_URL.to_string(),
            submit_url: DEFAULT_SUBMIT_URL.to_string(),
            fee: DEFAULT_FEE,
            network: "testnet-12".to_string(),
        }
    }
}

impl Config {
    pub fn prefix(&self) -> Prefix {
        match self.network.as_str() {
            "mainnet" => Prefix::Mainnet,
            _ => Prefix::Testnet,
        }
    }
}
