//! Client for the public REST indexer (`api-tn12.kaspa.org` style).

use std::time::Duration;

use serde_json::Value;

use crate::sdk::error::DeadmanError;
use crate::sdk::tx::UtxoRef;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct RestClient {
    base: String,
    http: reqwest::Client,
}

impl RestClient {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self {
            base,
            http: reqwest::Client::new(),
        }
    }

    async fn get_json(&self, path: &str) -> Result<Value, DeadmanError> {
        let url = format!("{}{path}", self.base);
        let resp = self
            .http
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| DeadmanError::Rpc(format!("GET {url}: {e}")))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(DeadmanError::Rpc(format!("GET {url}: HTTP {status}")));
        }
        resp.json()
            .await
            .map_err(|e| DeadmanError::Rpc(format!("GET {url}: malformed JSON: {e}")))
    }

    /// `GET /addresses/{address}/utxos`, parsed.
    pub async fn get_utxos(&self, address: &str) -> Result<Vec<UtxoRef>, DeadmanError> {
        let value = self.get_utxos_raw(address).await?;
        let entries = value
            .as_array()
            .ok_or_else(|| DeadmanError::Rpc("UTXO response is not an array".into()))?;
        entries.iter().map(UtxoRef::from_entry).collect()
    }

    /// `GET /addresses/{address}/utxos`, unmodified JSON (dashboard proxy).
    pub async fn get_utxos_raw(&self, address: &str) -> Result<Value, DeadmanError> {
        self.get_json(&format!("/addresses/{address}/utxos")).await
    }

    /// `GET /addresses/{address}/balance` -> sompi.
    pub async fn get_balance(&self, address: &str) -> Result<u64, DeadmanError> {
        let value = self.get_balance_raw(address).await?;
        value
            .get("balance")
            .and_then(|b| {
                b.as_u64()
                    .or_else(|| b.as_str().and_then(|s| s.parse().ok()))
            })
            .ok_or_else(|| DeadmanError::Rpc("balance response missing balance field".into()))
    }

    /// `GET /addresses/{address}/balance`, unmodified JSON (dashboard proxy).
    pub async fn get_balance_raw(&self, address: &str) -> Result<Value, DeadmanError> {
        self.get_json(&format!("/addresses/{address}/balance"))
            .await
    }
}
