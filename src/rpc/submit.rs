//! Submission client for the local dashboard RPC endpoint.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::sdk::error::DeadmanError;
use crate::sdk::tx::TxRecord;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct SubmitClient {
    url: String,
    http: reqwest::Client,
}

impl SubmitClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// POST `{method: "submitTransaction", params: [{transaction}]}` and
    /// extract the accepted transaction id. A response mentioning dust is
    /// reported as [`DeadmanError::DustRejected`] so the operator knows to
    /// retry with a full-balance send.
    pub async fn submit(&self, tx: &TxRecord) -> Result<String, DeadmanError> {
        let body = json!({
            "method": "submitTransaction",
            "params": [{ "transaction": tx }],
        });
        let resp = self
            .http
            .post(&self.url)
            .json(&body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| DeadmanError::Submit(format!("POST {}: {e}", self.url)))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| DeadmanError::Submit(format!("{e}")))?;
        parse_submit_response(status, &text)
    }
}

/// Interpret a submission response: dust rejections are surfaced as their
/// own error, anything else non-2xx or carrying an `error` member fails,
/// and a success yields the transaction id from either the JSON-RPC
/// `result` wrapper or a bare top-level field.
pub fn parse_submit_response(status: StatusCode, text: &str) -> Result<String, DeadmanError> {
    if text.to_lowercase().contains("dust") {
        return Err(DeadmanError::DustRejected);
    }
    if !status.is_success() {
        return Err(DeadmanError::Submit(format!("HTTP {status}: {text}")));
    }

    let response: Value = serde_json::from_str(text)
        .map_err(|e| DeadmanError::Submit(format!("malformed response: {e}")))?;
    if let Some(err) = response.get("error") {
        if !err.is_null() {
            return Err(DeadmanError::Submit(err.to_string()));
        }
    }

    let tx_id = response
        .get("result")
        .and_then(|r| r.get("transactionId"))
        .or_else(|| response.get("transactionId"))
        .and_then(Value::as_str)
        .map(str::to_string);

    // Some proxies acknowledge without echoing the id.
    Ok(tx_id.unwrap_or_else(|| "check explorer".to_string()))
}
