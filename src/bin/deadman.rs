//! Deadman contract CLI: inspect the compiled descriptor, derive its P2SH
//! address, check claimability, and build/submit the claim transaction.
//!
//! Usage:
//!   deadman inspect deadman_compiled.json
//!   deadman address <script-hex-or-json-file>
//!   deadman status deadman_compiled.json
//!   deadman claim deadman_compiled.json <private-key> [--submit]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::json;

use kaspa_deadman_lab::claim::{build_claim, submit_claim};
use kaspa_deadman_lab::config::{
    DEFAULT_API_BASE, DEFAULT_FEE, DEFAULT_SUBMIT_URL, DEFAULT_WRPC_URL,
};
use kaspa_deadman_lab::rpc::{RestClient, SubmitClient, WrpcClient};
use kaspa_deadman_lab::sdk::contract::{
    claim_window, ContractDescriptor, CLAIM_SELECTOR, DEFAULT_TIMEOUT_DAA,
};
use kaspa_deadman_lab::sdk::error::DeadmanError;
use kaspa_deadman_lab::sdk::signer::{SchnorrSigner, ScriptSigner};
use kaspa_deadman_lab::{parse_prefix, sompi_to_kas};

#[derive(Parser)]
#[command(name = "deadman")]
#[command(about = "Deadman switch contract tools for Kaspa TN12", long_about = None)]
struct Cli {
    #[arg(long, default_value = "testnet-12")]
    network: String,

    #[arg(long, default_value = DEFAULT_API_BASE)]
    api_base: String,

    #[arg(long, default_value = DEFAULT_WRPC_URL)]
    wrpc: String,

    #[arg(long, default_value = DEFAULT_SUBMIT_URL)]
    submit_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show contract name, script size, and entry points
    Inspect { contract: String },

    /// Derive the P2SH address for a script hex or descriptor file
    Address { contract: String },

    /// Funding state and claimability of the contract
    Status {
        contract: String,
        /// Contract timeout in DAA ticks
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_DAA)]
        timeout: u64,
    },

    /// Build (and optionally submit) the beneficiary claim transaction
    Claim {
        contract: String,
        private_key: String,
        /// Submit through the local dashboard endpoint after building
        #[arg(long)]
        submit: bool,
        /// Flat fee in sompi
        #[arg(long, default_value_t = DEFAULT_FEE)]
        fee: u64,
        /// Entry point selector byte (defaults to the ABI's claim entry)
        #[arg(long)]
        selector: Option<u8>,
        /// Where to write the transaction JSON dump
        #[arg(long, default_value = "claim_tx.json")]
        out: PathBuf,
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
        Commands::Inspect { contract } => {
            let descriptor = ContractDescriptor::load_arg(&contract)?;
            println!("=== {} ===", descriptor.contract_name);
            println!("Script size: {} bytes", descriptor.script.len());
            println!("Entrypoints:");
            for ep in descriptor.entrypoints() {
                println!("  - {ep}");
            }
            println!(
                "{}",
                json!({
                    "contract_name": descriptor.contract_name,
                    "script_len": descriptor.script.len(),
                    "entrypoints": descriptor.entrypoints(),
                    "address": descriptor.p2sh_address(prefix)?.to_string(),
                })
            );
        }

        Commands::Address { contract } => {
            let descriptor = ContractDescriptor::load_arg(&contract)?;
            let address = descriptor.p2sh_address(prefix)?;
            println!("{}", json!({ "address": address.to_string() }));
        }

        Commands::Status { contract, timeout } => {
            let descriptor = ContractDescriptor::load_arg(&contract)?;
            let address = descriptor.p2sh_address(prefix)?.to_string();
            println!("Contract address: {address}");

            let rest = RestClient::new(cli.api_base);
            let utxos = rest.get_utxos(&address).await?;
            let Some(utxo) = utxos.first() else {
                println!("No UTXOs - contract not funded!");
                println!("{}", json!({ "address": address, "funded": false }));
                return Ok(());
            };
            println!(
                "Balance: {} sompi ({:.8} KAS)",
                utxo.amount,
                sompi_to_kas(utxo.amount)
            );

            let wrpc = WrpcClient::new(cli.wrpc);
            let current_daa = wrpc.virtual_daa_score().await?;
            let window = claim_window(utxo.block_daa_score, current_daa, timeout);
            println!("Current DAA: {current_daa}");
            println!("Age: {} ticks (timeout {})", window.age, window.timeout);
            println!("Can claim: {}", if window.claimable { "YES" } else { "NO" });

            println!(
                "{}",
                json!({
                    "address": address,
                    "funded": true,
                    "balance": utxo.amount,
                    "utxoDaaScore": utxo.block_daa_score,
                    "currentDaa": current_daa,
                    "age": window.age,
                    "timeout": window.timeout,
                    "claimable": window.claimable,
                })
            );
        }

        Commands::Claim {
            contract,
            private_key,
            submit,
            fee,
            selector,
            out,
        } => {
            println!("=== Deadman Claim Transaction ===\n");

            let descriptor = ContractDescriptor::load_arg(&contract)?;
            println!("Contract script length: {}", descriptor.script.len());

            let signer = SchnorrSigner::from_hex(&private_key)?;
            println!("Beneficiary pubkey: {}", hex::encode(signer.x_only_pubkey()));
            println!("Beneficiary address: {}", signer.address(prefix));

            let selector = selector
                .or_else(|| descriptor.selector("claim"))
                .unwrap_or(CLAIM_SELECTOR);

            println!("\nFetching UTXOs...");
            let rest = RestClient::new(cli.api_base);
            let bundle = build_claim(&rest, &signer, &descriptor, prefix, fee, selector).await?;
            println!(
                "UTXO: {}:{} ({:.8} KAS)",
                bundle.utxo.transaction_id,
                bundle.utxo.index,
                sompi_to_kas(bundle.utxo.amount)
            );
            println!(
                "Send amount: {:.8} KAS (fee {fee} sompi)",
                sompi_to_kas(bundle.send_amount)
            );

            println!("\n=== Raw Transaction JSON ===");
            println!(
                "{}",
                serde_json::to_string_pretty(&bundle.tx)
                    .map_err(|e| DeadmanError::Io(format!("{e}")))?
            );

            bundle.tx.write_file(&out)?;
            println!("\nTransaction saved to {}", out.display());

            if submit {
                println!("\n=== Submitting Transaction ===");
                let client = SubmitClient::new(cli.submit_url);
                let tx_id = submit_claim(&client, &bundle.tx).await?;
                println!("{}", json!({ "txId": tx_id, "status": "submitted" }));
            } else {
                println!("\nTo submit, re-run with --submit");
                println!("{}", json!({ "status": "built", "file": out.display().to_string() }));
            }
        }
    }

    Ok(())
}
