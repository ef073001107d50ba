//! Wire-format transaction records and claim-transaction assembly.
//!
//! The JSON shape here must match the node RPC schema byte for byte:
//! camelCase field names, output values as decimal strings in sompi,
//! `gas` and `payload` as strings.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::DeadmanError;

/// Subnetwork id carried by every native transaction on TN12.
pub const SUBNETWORK_ID_NATIVE: &str =
    "00000000000000000000000000000000000000000000000000000000c0ffee00";

// ─── Wire records ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outpoint {
    pub transaction_id: String,
    pub index: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxInput {
    pub previous_outpoint: Outpoint,
    /// Hex-encoded unlocking script.
    pub signature_script: String,
    pub sequence: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpkRecord {
    pub version: u16,
    /// Hex-encoded locking script.
    pub script: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxOutput {
    /// Decimal string, sompi.
    pub value: String,
    pub script_public_key: SpkRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxRecord {
    pub version: u16,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    pub lock_time: u64,
    pub subnetwork_id: String,
    pub gas: String,
    pub payload: String,
}

impl TxRecord {
    /// Persist the record as pretty-printed JSON (the claim-transaction dump).
    pub fn write_file(&self, path: &Path) -> Result<(), DeadmanError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| DeadmanError::Io(format!("serialize transaction: {e}")))?;
        fs::write(path, json)?;
        Ok(())
    }
}

// ─── UTXO reference ──────────────────────────────────────────

/// A spendable output as reported by the REST indexer or the node RPC.
/// Immutable once fetched; consumed exactly once per spend attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtxoRef {
    pub transaction_id: String,
    pub index: u32,
    /// Sompi.
    pub amount: u64,
    pub script_public_key: Vec<u8>,
    pub block_daa_score: u64,
}

/// Both the REST indexer and the node serialize u64 fields as either JSON
/// numbers or decimal strings depending on the endpoint.
fn value_u64(v: &Value) -> Option<u64> {
    v.as_u64().or_else(|| v.as_str().and_then(|s| s.parse().ok()))
}

impl UtxoRef {
    /// Parse one entry of the `{outpoint, utxoEntry}` shape shared by
    /// `GET /addresses/{addr}/utxos` and `getUtxosByAddresses`.
    pub fn from_entry(entry: &Value) -> Result<Self, DeadmanError> {
        let outpoint = entry
            .get("outpoint")
            .ok_or_else(|| DeadmanError::Rpc("UTXO entry missing outpoint".into()))?;
        let transaction_id = outpoint
            .get("transactionId")
            .and_then(Value::as_str)
            .ok_or_else(|| DeadmanError::Rpc("UTXO outpoint missing transactionId".into()))?
            .to_string();
        let index = outpoint
            .get("index")
            .and_then(value_u64)
            .ok_or_else(|| DeadmanError::Rpc("UTXO outpoint missing index".into()))?
            as u32;

        let utxo_entry = entry
            .get("utxoEntry")
            .ok_or_else(|| DeadmanError::Rpc("UTXO entry missing utxoEntry".into()))?;
        let amount = utxo_entry
            .get("amount")
            .and_then(value_u64)
            .ok_or_else(|| DeadmanError::Rpc("UTXO entry missing amount".into()))?;
        let block_daa_score = utxo_entry
            .get("blockDaaScore")
            .and_then(value_u64)
            .unwrap_or(0);

        // The indexer nests the hex under scriptPublicKey.scriptPublicKey;
        // the node uses scriptPublicKey.script.
        let script_public_key = utxo_entry
            .get("scriptPublicKey")
            .and_then(|spk| {
                spk.get("scriptPublicKey")
                    .or_else(|| spk.get("script"))
                    .and_then(Value::as_str)
            })
            .map(hex::decode)
            .transpose()
            .map_err(|e| DeadmanError::Rpc(format!("UTXO scriptPublicKey not hex: {e}")))?
            .unwrap_or_default();

        Ok(Self {
            transaction_id,
            index,
            amount,
            script_public_key,
            block_daa_score,
        })
    }
}

// ─── Assembly ────────────────────────────────────────────────

/// Build a one-input, one-output spend of `utxo`, paying
/// `utxo.amount - fee` to `output_script`. A UTXO that cannot cover the
/// fee is an error, never a wrapping subtraction.
pub fn build_claim_tx(
    utxo: &UtxoRef,
    sig_script: &[u8],
    output_script: &[u8],
    fee: u64,
    lock_time: u64,
) -> Result<TxRecord, DeadmanError> {
    if utxo.amount <= fee {
        return Err(DeadmanError::InsufficientFunds {
            needed: fee + 1,
            available: utxo.amount,
        });
    }
    let send_amount = utxo.amount - fee;
    Ok(assemble(utxo, sig_script, output_script, send_amount, lock_time))
}

/// Spend `utxo` paying an explicit `value` to `output_script`; the UTXO
/// must cover `value + fee`. Whatever remains above that goes back to
/// `change_script`, so only the flat fee ever leaves the sender.
pub fn build_send_tx(
    utxo: &UtxoRef,
    sig_script: &[u8],
    output_script: &[u8],
    change_script: &[u8],
    value: u64,
    fee: u64,
) -> Result<TxRecord, DeadmanError> {
    let needed = value.saturating_add(fee);
    if utxo.amount < needed {
        return Err(DeadmanError::InsufficientFunds {
            needed,
            available: utxo.amount,
        });
    }
    let mut tx = assemble(utxo, sig_script, output_script, value, 0);
    let change = utxo.amount - needed;
    if change > 0 {
        tx.outputs.push(TxOutput {
            value: change.to_string(),
            script_public_key: SpkRecord {
                version: 0,
                script: hex::encode(change_script),
            },
        });
    }
    Ok(tx)
}

fn assemble(
    utxo: &UtxoRef,
    sig_script: &[u8],
    output_script: &[u8],
    send_amount: u64,
    lock_time: u64,
) -> TxRecord {
    TxRecord {
        version: 0,
        inputs: vec![TxInput {
            previous_outpoint: Outpoint {
                transaction_id: utxo.transaction_id.clone(),
                index: utxo.index,
            },
            signature_script: hex::encode(sig_script),
            sequence: 0,
        }],
        outputs: vec![TxOutput {
            value: send_amount.to_string(),
            script_public_key: SpkRecord {
                version: 0,
                script: hex::encode(output_script),
            },
        }],
        lock_time,
        subnetwork_id: SUBNETWORK_ID_NATIVE.to_string(),
        gas: "0".to_string(),
        payload: String::new(),
    }
}
