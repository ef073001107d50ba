//! JSON-RPC 2.0 over WebSocket, one request per connection.
//!
//! The node's wRPC endpoint answers a single framed request and the source
//! workflows never hold a connection open, so this client dials, sends,
//! reads one text frame and hangs up. A fixed timeout bounds the exchange.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::sdk::error::DeadmanError;
use crate::sdk::tx::UtxoRef;

const CALL_TIMEOUT: Duration = Duration::from_secs(10);

pub struct WrpcClient {
    url: String,
    next_id: AtomicU64,
}

impl WrpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Single JSON-RPC exchange. Returns the `result` member; an `error`
    /// member in the response maps to [`DeadmanError::Rpc`].
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, DeadmanError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let exchange = async {
            let (mut ws, _) = connect_async(&self.url)
                .await
                .map_err(|e| DeadmanError::Rpc(format!("connect {}: {e}", self.url)))?;
            ws.send(Message::Text(request.to_string().into()))
                .await
                .map_err(|e| DeadmanError::Rpc(format!("{method}: send failed: {e}")))?;

            while let Some(frame) = ws.next().await {
                let frame =
                    frame.map_err(|e| DeadmanError::Rpc(format!("{method}: recv failed: {e}")))?;
                if let Message::Text(text) = frame {
                    ws.close(None).await.ok();
                    let response: Value = serde_json::from_str(text.as_str()).map_err(|e| {
                        DeadmanError::Rpc(format!("{method}: malformed response: {e}"))
                    })?;
                    if let Some(err) = response.get("error") {
                        if !err.is_null() {
                            return Err(DeadmanError::Rpc(format!("{method}: {err}")));
                        }
                    }
                    return Ok(response.get("result").cloned().unwrap_or(Value::Null));
                }
            }
            Err(DeadmanError::Rpc(format!(
                "{method}: connection closed without response"
            )))
        };

        match tokio::time::timeout(CALL_TIMEOUT, exchange).await {
            Ok(result) => result,
            Err(_) => Err(DeadmanError::Rpc(format!("{method}: timed out"))),
        }
    }

    pub async fn get_info(&self) -> Result<Value, DeadmanError> {
        self.call("getInfo", json!({})).await
    }

    pub async fn get_block_dag_info(&self) -> Result<Value, DeadmanError> {
        self.call("get_block_dag_info", json!([])).await
    }

    pub async fn virtual_daa_score(&self) -> Result<u64, DeadmanError> {
        let info = self.get_block_dag_info().await?;
        info.get("virtualDaaScore")
            .and_then(|v| {
                v.as_u64()
                    .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
            })
            .ok_or_else(|| DeadmanError::Rpc("DAG info missing virtualDaaScore".into()))
    }

    /// `getUtxosByAddresses`, retrying once with the legacy capitalization
    /// older nodes expect.
    pub async fn get_utxos_by_addresses(
        &self,
        addresses: &[String],
    ) -> Result<Vec<UtxoRef>, DeadmanError> {
        let params = json!({ "addresses": addresses });
        let result = match self.call("getUtxosByAddresses", params.clone()).await {
            Ok(v) => v,
            Err(DeadmanError::Rpc(msg)) if msg.to_lowercase().contains("method") => {
                self.call("getUTXOsByAddresses", params).await?
            }
            Err(e) => return Err(e),
        };
        let entries = result
            .get("entries")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        entries.iter().map(|e| UtxoRef::from_entry(e)).collect()
    }
}
