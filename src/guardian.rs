//! Guardian: the heartbeat monitor that fires the deadman switch.
//!
//! The contract owner records a heartbeat on a schedule; if the heartbeat
//! goes stale past the timeout plus a grace period, the guardian executes
//! the claim pipeline with the beneficiary's key. State is a single JSON
//! heartbeat file next to the config, so a restarted guardian picks up
//! where it left off.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::claim::{build_claim, submit_claim};
use crate::config::Config;
use crate::rpc::{RestClient, SubmitClient};
use crate::sdk::contract::{ContractDescriptor, CLAIM_SELECTOR};
use crate::sdk::error::DeadmanError;
use crate::sdk::signer::SchnorrSigner;

/// Consecutive claim failures before the guardian stops retrying.
const MAX_CLAIM_FAILURES: u32 = 3;

// ─── Config ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// Seconds between monitor passes.
    pub check_interval: u64,
    /// Seconds of heartbeat silence before the switch arms.
    pub timeout_period: u64,
    /// Extra seconds after timeout before the claim actually fires.
    pub grace_period: u64,
    /// Warn when remaining time drops below this many seconds (0 disables).
    pub warn_below: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            check_interval: 60,
            timeout_period: 300,
            grace_period: 60,
            warn_below: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardianConfig {
    pub name: String,
    /// Shared secret the owner must present to record a heartbeat.
    pub heartbeat_key: String,
    #[serde(default)]
    pub timing: Timing,
    pub contract_file: PathBuf,
    pub beneficiary_private_key: String,
    #[serde(default)]
    pub selector: Option<u8>,
    #[serde(default)]
    pub endpoints: Config,
}

// ─── Heartbeat state ─────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heartbeat {
    pub key: String,
    /// Unix seconds.
    pub timestamp: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardianStatus {
    NoHeartbeat,
    Ok { remaining: u64 },
    Warning { remaining: u64 },
    GracePeriod { remaining: u64 },
    Timeout,
}

pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// ─── Guardian ────────────────────────────────────────────────

pub struct Guardian {
    config: GuardianConfig,
    heartbeat_path: PathBuf,
}

impl Guardian {
    pub fn new(config: GuardianConfig, heartbeat_path: PathBuf) -> Self {
        Self {
            config,
            heartbeat_path,
        }
    }

    /// Load the config file; the heartbeat file lives next to it.
    pub fn load(config_path: &Path) -> Result<Self, DeadmanError> {
        let text = fs::read_to_string(config_path)
            .map_err(|e| DeadmanError::Io(format!("read {}: {e}", config_path.display())))?;
        let config: GuardianConfig = serde_json::from_str(&text)
            .map_err(|e| DeadmanError::InvalidInput(format!("parse {}: {e}", config_path.display())))?;
        let heartbeat_path = config_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("heartbeat.json");
        Ok(Self::new(config, heartbeat_path))
    }

    pub fn config(&self) -> &GuardianConfig {
        &self.config
    }

    /// Record a heartbeat. The presented key must match the configured one.
    pub fn record_heartbeat(&self, key: &str) -> Result<Heartbeat, DeadmanError> {
        if key != self.config.heartbeat_key {
            return Err(DeadmanError::InvalidInput("invalid heartbeat key".into()));
        }
        let heartbeat = Heartbeat {
            key: key.to_string(),
            timestamp: unix_now(),
        };
        let json = serde_json::to_string_pretty(&heartbeat)
            .map_err(|e| DeadmanError::Io(format!("{e}")))?;
        fs::write(&self.heartbeat_path, json)?;
        Ok(heartbeat)
    }

    pub fn last_heartbeat(&self) -> Option<Heartbeat> {
        let text = fs::read_to_string(&self.heartbeat_path).ok()?;
        serde_json::from_str(&text).ok()
    }

    /// Classify the heartbeat age at time `now` (unix seconds).
    pub fn check_timeout(&self, now: u64) -> GuardianStatus {
        let heartbeat = match self.last_heartbeat() {
            Some(hb) => hb,
            None => return GuardianStatus::NoHeartbeat,
        };
        let elapsed = now.saturating_sub(heartbeat.timestamp);
        let timeout = self.config.timing.timeout_period;
        let grace_end = timeout + self.config.timing.grace_period;

        if elapsed >= grace_end {
            GuardianStatus::Timeout
        } else if elapsed >= timeout {
            GuardianStatus::GracePeriod {
                remaining: grace_end - elapsed,
            }
        } else {
            let remaining = timeout - elapsed;
            if self.config.timing.warn_below > 0 && remaining <= self.config.timing.warn_below {
                GuardianStatus::Warning { remaining }
            } else {
                GuardianStatus::Ok { remaining }
            }
        }
    }

    /// Build, sign, and submit the claim with the beneficiary's key.
    pub async fn execute_claim(&self) -> Result<String, DeadmanError> {
        let contract = ContractDescriptor::load(&self.config.contract_file)?;
        let signer = SchnorrSigner::from_hex(&self.config.beneficiary_private_key)?;
        let selector = self
            .config
            .selector
            .or_else(|| contract.selector("claim"))
            .unwrap_or(CLAIM_SELECTOR);

        let endpoints = &self.config.endpoints;
        let rest = RestClient::new(endpoints.api_base.clone());
        let bundle = build_claim(
            &rest,
            &signer,
            &contract,
            endpoints.prefix(),
            endpoints.fee,
            selector,
        )
        .await?;

        let submit = SubmitClient::new(endpoints.submit_url.clone());
        let tx_id = submit_claim(&submit, &bundle.tx).await?;
        eprintln!(
            "[guardian] Claim submitted for {} ({} sompi): {tx_id}",
            bundle.contract_address, bundle.send_amount
        );
        Ok(tx_id)
    }

    /// Monitor loop: one pass per `check_interval`, claiming once the
    /// timeout and grace period have both elapsed. Stops retrying after
    /// repeated claim failures rather than hammering the node forever.
    pub async fn run_monitor(&self) {
        let interval = std::time::Duration::from_secs(self.config.timing.check_interval.max(1));
        let mut ticker = tokio::time::interval(interval);
        let mut failures: u32 = 0;
        let mut executed = false;

        eprintln!(
            "[guardian] Monitoring '{}' every {}s (timeout {}s, grace {}s)",
            self.config.name,
            interval.as_secs(),
            self.config.timing.timeout_period,
            self.config.timing.grace_period
        );

        loop {
            ticker.tick().await;
            if executed {
                continue;
            }
            match self.check_timeout(unix_now()) {
                GuardianStatus::Timeout => {
                    eprintln!("[guardian] Timeout + grace expired, executing claim");
                    match self.execute_claim().await {
                        Ok(_) => {
                            executed = true;
                            failures = 0;
                        }
                        Err(e) => {
                            failures = failures.saturating_add(1);
                            eprintln!("[guardian] Claim attempt {failures} failed: {e}");
                            if failures >= MAX_CLAIM_FAILURES {
                                eprintln!(
                                    "[guardian] Giving up after {failures} consecutive failures"
                                );
                                executed = true;
                            }
                        }
                    }
                }
                GuardianStatus::GracePeriod { remaining } => {
                    eprintln!("[guardian] Grace period, {remaining}s until claim");
                }
                GuardianStatus::Warning { remaining } => {
                    eprintln!("[guardian] Warning: {remaining}s of heartbeat slack left");
                }
                GuardianStatus::NoHeartbeat => {
                    eprintln!("[guardian] No heartbeat recorded yet");
                }
                GuardianStatus::Ok { .. } => {}
            }
        }
    }
}
