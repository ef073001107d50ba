//! Local dashboard API: the HTTP surface the claim scripts point at.
//!
//! Proxies the public REST indexer for balance/UTXO reads and forwards a
//! small allow-list of JSON-RPC methods (`submitTransaction`,
//! `get_block_dag_info`, `getInfo`) to the node, so browser dashboards and
//! CLI tools only ever talk to localhost.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rpc::{RestClient, WrpcClient};

// ─── App State ───────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub rest: Arc<RestClient>,
    pub wrpc: Arc<WrpcClient>,
}

// ─── Error helpers ───────────────────────────────────────────

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn bad_request(msg: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse { error: msg.into() }),
    )
}

fn bad_gateway(msg: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_GATEWAY,
        Json(ErrorResponse { error: msg.into() }),
    )
}

type ApiResult = Result<(StatusCode, Json<Value>), (StatusCode, Json<ErrorResponse>)>;

// ─── GET /api/balance ────────────────────────────────────────

async fn balance(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult {
    let address = params
        .get("address")
        .ok_or_else(|| bad_request("missing address parameter"))?;
    let value = state
        .rest
        .get_balance_raw(address)
        .await
        .map_err(|e| bad_gateway(format!("{e}")))?;
    Ok((StatusCode::OK, Json(value)))
}

// ─── GET /api/utxos ──────────────────────────────────────────

async fn utxos(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult {
    let address = params
        .get("address")
        .ok_or_else(|| bad_request("missing address parameter"))?;
    let value = state
        .rest
        .get_utxos_raw(address)
        .await
        .map_err(|e| bad_gateway(format!("{e}")))?;
    Ok((StatusCode::OK, Json(value)))
}

// ─── POST /api/rpc ───────────────────────────────────────────

#[derive(Deserialize)]
struct RpcRequest {
    method: String,
    #[serde(default)]
    params: Value,
}

async fn rpc(State(state): State<AppState>, Json(req): Json<RpcRequest>) -> ApiResult {
    let result = match req.method.as_str() {
        "submitTransaction" => state.wrpc.call("submitTransaction", req.params).await,
        "get_block_dag_info" | "getBlockDagInfo" => state.wrpc.get_block_dag_info().await,
        "getInfo" => state.wrpc.get_info().await,
        other => return Err(bad_request(format!("unsupported method: {other}"))),
    };
    match result {
        Ok(value) => Ok((StatusCode::OK, Json(value))),
        Err(e) => Err(bad_gateway(format!("{e}"))),
    }
}

// ─── Router ──────────────────────────────────────────────────

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/balance", get(balance))
        .route("/api/utxos", get(utxos))
        .route("/api/rpc", post(rpc))
        .with_state(state)
}
