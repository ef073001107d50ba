//! Compiled contract descriptor: the JSON artifact the contract compiler
//! emits (`deadman_compiled.json`), plus P2SH address derivation and the
//! claim-window arithmetic.

use std::fs;
use std::path::Path;

use kaspa_addresses::{Address, Prefix};
use kaspa_txscript::{pay_to_script_hash_script, standard::extract_script_pub_key_address};
use serde::{Deserialize, Serialize};

use super::error::DeadmanError;

/// Contract timeout in DAA ticks before `claim` goes live (~10 min on TN12).
pub const DEFAULT_TIMEOUT_DAA: u64 = 600;

/// Selector byte for the `claim` entry point when the descriptor carries
/// no ABI to resolve it from.
pub const CLAIM_SELECTOR: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbiInput {
    pub name: String,
    pub type_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbiEntry {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<AbiInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractDescriptor {
    pub contract_name: String,
    /// Raw script bytes, serialized as a JSON array of byte values.
    pub script: Vec<u8>,
    #[serde(default)]
    pub abi: Vec<AbiEntry>,
}

impl ContractDescriptor {
    /// Load a descriptor from a compiled-contract JSON file.
    pub fn load(path: &Path) -> Result<Self, DeadmanError> {
        let text = fs::read_to_string(path)
            .map_err(|e| DeadmanError::Descriptor(format!("read {}: {e}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| DeadmanError::Descriptor(format!("parse {}: {e}", path.display())))
    }

    /// Wrap a bare script hex string in an anonymous descriptor.
    pub fn from_script_hex(script_hex: &str) -> Result<Self, DeadmanError> {
        let script = hex::decode(script_hex.trim())
            .map_err(|e| DeadmanError::Descriptor(format!("invalid script hex: {e}")))?;
        Ok(Self {
            contract_name: "script".to_string(),
            script,
            abi: Vec::new(),
        })
    }

    /// Resolve the CLI `script-hex-or-JSON-file` argument: a path ending in
    /// `.json` is a descriptor file, anything else is treated as hex.
    pub fn load_arg(arg: &str) -> Result<Self, DeadmanError> {
        if arg.ends_with(".json") {
            Self::load(Path::new(arg))
        } else {
            Self::from_script_hex(arg)
        }
    }

    /// P2SH address committing to this contract's script.
    pub fn p2sh_address(&self, prefix: Prefix) -> Result<Address, DeadmanError> {
        if self.script.is_empty() {
            return Err(DeadmanError::Descriptor("no script found".into()));
        }
        let spk = pay_to_script_hash_script(&self.script);
        extract_script_pub_key_address(&spk, prefix)
            .map_err(|e| DeadmanError::Descriptor(format!("address derivation failed: {e}")))
    }

    /// Selector byte for a named entry point: 1-based position in the ABI.
    /// Falls back to [`CLAIM_SELECTOR`] for `claim` when no ABI is present.
    pub fn selector(&self, entrypoint: &str) -> Option<u8> {
        let pos = self.abi.iter().position(|e| e.name == entrypoint);
        match pos {
            Some(i) => u8::try_from(i + 1).ok(),
            None if entrypoint == "claim" && self.abi.is_empty() => Some(CLAIM_SELECTOR),
            None => None,
        }
    }

    /// Human-readable entry point signatures, e.g. `claim(beneficiarySig:sig)`.
    pub fn entrypoints(&self) -> Vec<String> {
        self.abi
            .iter()
            .map(|e| {
                let inputs = e
                    .inputs
                    .iter()
                    .map(|i| format!("{}:{}", i.name, i.type_name))
                    .collect::<Vec<_>>()
                    .join(", ");
                if inputs.is_empty() {
                    format!("{}()", e.name)
                } else {
                    format!("{}({inputs})", e.name)
                }
            })
            .collect()
    }
}

// ─── Claim window ────────────────────────────────────────────

/// Whether the funding UTXO is old enough for the beneficiary to claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimWindow {
    /// DAA ticks elapsed since the funding UTXO was accepted.
    pub age: u64,
    pub timeout: u64,
    pub claimable: bool,
}

pub fn claim_window(utxo_daa_score: u64, current_daa_score: u64, timeout: u64) -> ClaimWindow {
    let age = current_daa_score.saturating_sub(utxo_daa_score);
    ClaimWindow {
        age,
        timeout,
        claimable: age >= timeout,
    }
}
