//! Integration tests for the dashboard proxy API.
//!
//! These run against the axum router directly with unconnected upstream
//! clients — every request here fails validation before any network call
//! fires, so no indexer or node is needed.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use kaspa_deadman_lab::api::{build_router, AppState};
use kaspa_deadman_lab::rpc::{RestClient, WrpcClient};

// ─── Test helpers ───────────────────────────────────────────

fn test_app() -> axum::Router {
    let state = AppState {
        rest: Arc::new(RestClient::new("http://127.0.0.1:1")),
        wrpc: Arc::new(WrpcClient::new("ws://127.0.0.1:1")),
    };
    build_router(state)
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

async fn post_json(app: axum::Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ─── Validation paths ───────────────────────────────────────

#[tokio::test]
async fn balance_requires_address_param() {
    let (status, json) = get_json(test_app(), "/api/balance").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("address"));
}

#[tokio::test]
async fn utxos_requires_address_param() {
    let (status, json) = get_json(test_app(), "/api/utxos").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("address"));
}

#[tokio::test]
async fn rpc_rejects_unknown_methods() {
    let (status, json) = post_json(
        test_app(),
        "/api/rpc",
        r#"{"method": "shutdown", "params": {}}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("unsupported method"));
}

#[tokio::test]
async fn rpc_params_are_optional() {
    // Allow-listed method with no params: passes validation, fails only at
    // the (unreachable) node, surfacing as a gateway error.
    let (status, json) = post_json(test_app(), "/api/rpc", r#"{"method": "getInfo"}"#).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json["error"].is_string());
}

// ─── Upstream failure mapping ───────────────────────────────

#[tokio::test]
async fn unreachable_indexer_maps_to_bad_gateway() {
    let (status, json) = get_json(test_app(), "/api/balance?address=kaspatest:qtest").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let req = Request::builder()
        .method("GET")
        .uri("/api/nope")
        .body(Body::empty())
        .unwrap();
    let resp = test_app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
