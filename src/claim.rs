//! The claim pipeline: fetch the contract's funding UTXO, sign, assemble
//! the spend, and optionally submit. Shared by the `deadman claim`
//! subcommand and the guardian's automatic execution.

use kaspa_addresses::Prefix;
use kaspa_consensus_core::tx::ScriptPublicKey;
use kaspa_txscript::pay_to_script_hash_script;

use crate::rpc::{RestClient, SubmitClient};
use crate::sdk::contract::ContractDescriptor;
use crate::sdk::error::DeadmanError;
use crate::sdk::script::{claim_sig_script, p2pk_script};
use crate::sdk::signer::ScriptSigner;
use crate::sdk::tx::{build_claim_tx, TxRecord, UtxoRef};

/// The assembled claim with the context a caller may want to report.
pub struct ClaimBundle {
    pub tx: TxRecord,
    pub utxo: UtxoRef,
    pub contract_address: String,
    pub send_amount: u64,
}

/// Assemble a claim transaction spending the first UTXO at the contract's
/// P2SH address to the signer's own P2PK output.
///
/// The signature covers the P2SH locking script, matching the external
/// SDK's `sign_script_hash` convention the contract was deployed against.
pub async fn build_claim(
    rest: &RestClient,
    signer: &dyn ScriptSigner,
    contract: &ContractDescriptor,
    prefix: Prefix,
    fee: u64,
    selector: u8,
) -> Result<ClaimBundle, DeadmanError> {
    let address = contract.p2sh_address(prefix)?;
    let contract_address = address.to_string();

    let utxos = rest.get_utxos(&contract_address).await?;
    let utxo = utxos
        .into_iter()
        .next()
        .ok_or_else(|| DeadmanError::Rpc("no UTXOs found at contract address".into()))?;

    let p2sh_spk: ScriptPublicKey = pay_to_script_hash_script(&contract.script);
    let signature = signer.sign_script_hash(p2sh_spk.script())?;

    let sig_script = claim_sig_script(&signature, selector);
    let output_script = p2pk_script(&signer.x_only_pubkey());

    let tx = build_claim_tx(&utxo, &sig_script, &output_script, fee, 0)?;
    let send_amount = utxo.amount - fee;

    Ok(ClaimBundle {
        tx,
        utxo,
        contract_address,
        send_amount,
    })
}

/// Submit an assembled claim through the local dashboard endpoint.
pub async fn submit_claim(submit: &SubmitClient, tx: &TxRecord) -> Result<String, DeadmanError> {
    submit.submit(tx).await
}
