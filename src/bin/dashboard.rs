//! Dashboard proxy server: serves the local API the claim scripts and the
//! browser dashboard point at, on port 3001.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use kaspa_deadman_lab::api::{build_router, AppState};
use kaspa_deadman_lab::config::{DEFAULT_API_BASE, DEFAULT_WRPC_URL};
use kaspa_deadman_lab::rpc::{RestClient, WrpcClient};

#[derive(Parser)]
#[command(name = "dashboard")]
#[command(about = "Local API proxy for the deadman dashboard", long_about = None)]
struct Cli {
    #[arg(long, default_value = DEFAULT_API_BASE)]
    api_base: String,

    #[arg(long, default_value = DEFAULT_WRPC_URL)]
    wrpc: String,

    #[arg(long, default_value_t = 3001)]
    port: u16,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let rest = Arc::new(RestClient::new(cli.api_base.clone()));
    let wrpc = Arc::new(WrpcClient::new(cli.wrpc.clone()));

    // A node that is down should not stop the proxy from serving REST reads.
    match wrpc.get_info().await {
        Ok(info) => println!("[dashboard] Node reachable at {}: {info}", wrpc.url()),
        Err(e) => eprintln!("[dashboard] Node check failed ({e}), RPC proxying may fail"),
    }

    let state = AppState { rest, wrpc };
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", cli.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("[dashboard] bind {addr}: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("[dashboard] Listening on http://{addr}");
    println!("[dashboard]   GET  /api/balance?address=...");
    println!("[dashboard]   GET  /api/utxos?address=...");
    println!("[dashboard]   POST /api/rpc");
    println!("[dashboard] REST upstream: {}", cli.api_base);
    println!("[dashboard] Node wRPC:     {}", cli.wrpc);

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("[dashboard] server error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
