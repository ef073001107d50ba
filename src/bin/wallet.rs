//! Wallet CLI for plain P2PK funds on Kaspa TN12: key generation, balance
//! and UTXO queries against the REST indexer, and a single-UTXO send.
//!
//! Usage:
//!   wallet generate
//!   wallet load <private-key>
//!   wallet balance <address>
//!   wallet utxos <address>
//!   wallet send <private-key> <recipient> [amount-kas] [--submit]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use kaspa_addresses::Address;
use kaspa_txscript::pay_to_address_script;
use serde_json::json;

use kaspa_deadman_lab::config::{DEFAULT_API_BASE, DEFAULT_FEE, DEFAULT_SUBMIT_URL};
use kaspa_deadman_lab::rpc::{RestClient, SubmitClient};
use kaspa_deadman_lab::sdk::error::DeadmanError;
use kaspa_deadman_lab::sdk::script::{p2pk_script, unlocking_script};
use kaspa_deadman_lab::sdk::signer::{SchnorrSigner, ScriptSigner};
use kaspa_deadman_lab::sdk::tx::{build_claim_tx, build_send_tx};
use kaspa_deadman_lab::{generate_keypair, kas_to_sompi, parse_prefix, sompi_to_kas};

#[derive(Parser)]
#[command(name = "wallet")]
#[command(about = "Minimal P2PK wallet for Kaspa TN12", long_about = None)]
struct Cli {
    #[arg(long, default_value = "testnet-12")]
    network: String,

    #[arg(long, default_value = DEFAULT_API_BASE)]
    api_base: String,

    #[arg(long, default_value = DEFAULT_SUBMIT_URL)]
    submit_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a fresh keypair and print its address
    Generate,

    /// Derive the public key and address for an existing private key
    Load { private_key: String },

    /// Address balance in sompi and KAS
    Balance { address: String },

    /// List spendable UTXOs at an address
    Utxos { address: String },

    /// Spend the largest UTXO to a recipient (whole balance if no amount)
    Send {
        private_key: String,
        recipient: String,
        /// Amount in KAS; omit to send everything minus the fee
        amount: Option<f64>,
        /// Submit through the local dashboard endpoint after building
        #[arg(long)]
        submit: bool,
        /// Flat fee in sompi
        #[arg(long, default_value_t = DEFAULT_FEE)]
        fee: u64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{}", json!({ "error": e.to_string() }));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), DeadmanError> {
    let prefix = parse_prefix(&cli.network);

    match cli.command {
        Commands::Generate => {
            let (keypair, pubkey) = generate_keypair();
            let secret = keypair.secret_bytes();
            let signer = SchnorrSigner::new(keypair);
            println!(
                "{}",
                json!({
                    "private_key": hex::encode(secret),
                    "public_key": hex::encode(pubkey),
                    "address": signer.address(prefix).to_string(),
                    "network": cli.network,
                })
            );
        }

        Commands::Load { private_key } => {
            let signer = SchnorrSigner::from_hex(&private_key)?;
            println!(
                "{}",
                json!({
                    "public_key": hex::encode(signer.x_only_pubkey()),
                    "address": signer.address(prefix).to_string(),
                    "network": cli.network,
                })
            );
        }

        Commands::Balance { address } => {
            let rest = RestClient::new(cli.api_base);
            let balance = rest.get_balance(&address).await?;
            println!(
                "{}",
                json!({
                    "address": address,
                    "balance": balance,
                    "kas": sompi_to_kas(balance),
                })
            );
        }

        Commands::Utxos { address } => {
            let rest = RestClient::new(cli.api_base);
            let utxos = rest.get_utxos(&address).await?;
            println!("{} UTXO(s) at {address}", utxos.len());
            for u in &utxos {
                println!(
                    "  {}:{} {} sompi (DAA {})",
                    u.transaction_id, u.index, u.amount, u.block_daa_score
                );
            }
            let entries: Vec<_> = utxos
                .iter()
                .map(|u| {
                    json!({
                        "transactionId": u.transaction_id,
                        "index": u.index,
                        "amount": u.amount,
                        "blockDaaScore": u.block_daa_score,
                    })
                })
                .collect();
            println!("{}", json!({ "address": address, "utxos": entries }));
        }

        Commands::Send {
            private_key,
            recipient,
            amount,
            submit,
            fee,
        } => {
            let signer = SchnorrSigner::from_hex(&private_key)?;
            let from_address = signer.address(prefix).to_string();
            println!("From: {from_address}");
            println!("To:   {recipient}");

            let to_address = Address::try_from(recipient.as_str())
                .map_err(|e| DeadmanError::InvalidInput(format!("invalid recipient: {e}")))?;

            let rest = RestClient::new(cli.api_base);
            let mut utxos = rest.get_utxos(&from_address).await?;
            utxos.sort_by(|a, b| b.amount.cmp(&a.amount));
            let utxo = utxos
                .into_iter()
                .next()
                .ok_or_else(|| DeadmanError::Rpc("no UTXOs at sender address".into()))?;

            let value = amount.map(kas_to_sompi).transpose()?;

            let signature = signer.sign_script_hash(&utxo.script_public_key)?;
            let sig_script =
                unlocking_script(&signature, &signer.x_only_pubkey(), None);
            let output_script = pay_to_address_script(&to_address).script().to_vec();
            let change_script = p2pk_script(&signer.x_only_pubkey());

            let tx = match value {
                Some(v) => {
                    build_send_tx(&utxo, &sig_script, &output_script, &change_script, v, fee)?
                }
                None => build_claim_tx(&utxo, &sig_script, &output_script, fee, 0)?,
            };

            let sent: u64 = tx.outputs[0].value.parse().unwrap_or(0);
            println!(
                "Sending {:.8} KAS from {}:{} (fee {fee} sompi)",
                sompi_to_kas(sent),
                utxo.transaction_id,
                utxo.index
            );
            println!("{}", serde_json::to_string_pretty(&tx).map_err(|e| DeadmanError::Io(format!("{e}")))?);

            if submit {
                let client = SubmitClient::new(cli.submit_url);
                let tx_id = client.submit(&tx).await?;
                println!("{}", json!({ "txId": tx_id, "status": "submitted" }));
            } else {
                println!("{}", json!({ "status": "built" }));
            }
        }
    }

    Ok(())
}
