// =============================================================================
// Friday Scan — Main Entry Point
// =============================================================================
//
// Serves the single-page market scan dashboard. Each "execute scan" request
// fetches bars, computes indicators and returns metrics plus a chart; nothing
// is kept between requests.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod binance;
mod chart;
mod indicators;
mod market_data;
mod patterns;
mod runtime_config;
mod scan;
mod summary;
mod types;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::runtime_config::RuntimeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & logging ─────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Friday Scan — starting up");

    // ── 2. Configuration ─────────────────────────────────────────────────
    let config_path =
        std::env::var("FRIDAY_CONFIG").unwrap_or_else(|_| "friday_config.json".into());
    let mut config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });
    config.apply_env(|key| std::env::var(key).ok());

    info!(
        provider = %config.provider,
        default_symbol = %config.default_symbol,
        default_timeframe = %config.default_timeframe,
        lookback_days = config.lookback_days,
        "configuration resolved"
    );

    // ── 3. Shared state ──────────────────────────────────────────────────
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::from_config(config)?);

    // ── 4. HTTP dashboard ────────────────────────────────────────────────
    let app = api::rest::router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind dashboard on {bind_addr}"))?;
    info!(addr = %bind_addr, "dashboard listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("dashboard server failed")?;

    info!("Friday Scan shut down complete.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    warn!("Shutdown signal received — stopping gracefully");
}
