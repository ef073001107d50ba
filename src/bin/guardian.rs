//! Guardian CLI: record heartbeats, inspect the switch state, and run the
//! monitor that fires the claim when the owner goes silent.
//!
//! Usage:
//!   guardian init
//!   guardian heartbeat <key>
//!   guardian status
//!   guardian execute
//!   guardian monitor

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::json;

use kaspa_deadman_lab::config::Config;
use kaspa_deadman_lab::guardian::{unix_now, Guardian, GuardianConfig, GuardianStatus, Timing};
use kaspa_deadman_lab::sdk::error::DeadmanError;

#[derive(Parser)]
#[command(name = "guardian")]
#[command(about = "Deadman switch heartbeat monitor", long_about = None)]
struct Cli {
    /// Guardian config file
    #[arg(long, default_value = "guardian.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a template config file to edit
    Init,

    /// Record an owner heartbeat (the key must match the config)
    Heartbeat { key: String },

    /// Show the current switch state
    Status,

    /// Build, sign, and submit the claim immediately
    Execute,

    /// Watch the heartbeat and claim automatically on timeout
    Monitor,
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
    match cli.command {
        Commands::Init => return init_config(&cli.config),

        Commands::Heartbeat { key } => {
            let guardian = Guardian::load(&cli.config)?;
            let heartbeat = guardian.record_heartbeat(&key)?;
            println!(
                "{}",
                json!({
                    "status": "recorded",
                    "timestamp": heartbeat.timestamp,
                })
            );
        }

        Commands::Status => {
            let guardian = Guardian::load(&cli.config)?;
            let timing = &guardian.config().timing;
            let last = guardian.last_heartbeat();
            let status = guardian.check_timeout(unix_now());
            let (label, remaining) = match status {
                GuardianStatus::NoHeartbeat => ("no_heartbeat", None),
                GuardianStatus::Ok { remaining } => ("ok", Some(remaining)),
                GuardianStatus::Warning { remaining } => ("warning", Some(remaining)),
                GuardianStatus::GracePeriod { remaining } => ("grace_period", Some(remaining)),
                GuardianStatus::Timeout => ("timeout", None),
            };
            println!(
                "{}",
                json!({
                    "name": guardian.config().name,
                    "status": label,
                    "remaining": remaining,
                    "last_heartbeat": last.map(|hb| hb.timestamp),
                    "timeout_period": timing.timeout_period,
                    "grace_period": timing.grace_period,
                })
            );
        }

        Commands::Execute => {
            let guardian = Guardian::load(&cli.config)?;
            let tx_id = guardian.execute_claim().await?;
            println!("{}", json!({ "txId": tx_id, "status": "submitted" }));
        }

        Commands::Monitor => {
            let guardian = Guardian::load(&cli.config)?;
            guardian.run_monitor().await;
        }
    }

    Ok(())
}

fn init_config(path: &PathBuf) -> Result<(), DeadmanError> {
    if path.exists() {
        return Err(DeadmanError::InvalidInput(format!(
            "{} already exists",
            path.display()
        )));
    }
    let template = GuardianConfig {
        name: "deadman-guardian".to_string(),
        heartbeat_key: "change-me".to_string(),
        timing: Timing::default(),
        contract_file: PathBuf::from("deadman_compiled.json"),
        beneficiary_private_key: String::new(),
        selector: None,
        endpoints: Config::default(),
    };
    let json = serde_json::to_string_pretty(&template)
        .map_err(|e| DeadmanError::Io(format!("{e}")))?;
    std::fs::write(path, json)?;
    println!("{}", json!({ "status": "created", "file": path.display().to_string() }));
    Ok(())
}
