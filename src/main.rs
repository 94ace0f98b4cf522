// =============================================================================
// Nifty Confluence — Main Entry Point
// =============================================================================
//
// Serves intraday RSI / opening-range confluence analytics over HTTP. Each
// request fetches a fresh chart from upstream and recomputes everything; the
// process holds no market state between requests.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod engine;
mod indicators;
mod levels;
mod market_data;
mod runtime_config;
mod settings;
mod signals;
mod types;
mod yahoo;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::runtime_config::RuntimeConfig;

const DEFAULT_CONFIG_PATH: &str = "confluence_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Nifty Confluence starting up");

    let config_path =
        std::env::var("CONFLUENCE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    let mut config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    if let Ok(symbol) = std::env::var("CONFLUENCE_SYMBOL") {
        let symbol = symbol.trim();
        if !symbol.is_empty() {
            config.symbol = symbol.to_uppercase();
        }
    }

    info!(
        symbol = %config.symbol,
        interval = %config.interval,
        range = %config.range,
        opening_window_secs = config.analysis.opening_window_secs,
        "Configured chart source"
    );

    // ── 2. Shared state ──────────────────────────────────────────────────
    let state = Arc::new(AppState::new(&config)?);

    // ── 3. API server ────────────────────────────────────────────────────
    let bind_addr =
        std::env::var("CONFLUENCE_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".into());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server on {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, api::rest::router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            warn!("Shutdown signal received — stopping gracefully");
        })
        .await
        .context("API server failed")?;

    info!("Nifty Confluence shut down complete.");
    Ok(())
}
