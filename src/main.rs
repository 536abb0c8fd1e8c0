// =============================================================================
// Stockboard — Main Entry Point
// =============================================================================
//
// Loads config, fills the stock tables (seed file or mock generator) and
// serves the dashboard API until Ctrl+C.
// =============================================================================

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use stockboard::api;
use stockboard::app_state::AppState;
use stockboard::runtime_config::RuntimeConfig;

const CONFIG_PATH: &str = "stockboard.json";

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        return;
    }
    warn!("Shutdown signal received — stopping gracefully");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Stockboard starting up");

    let mut config = RuntimeConfig::load(CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });
    config.apply_env();

    info!(
        bind_addr = %config.bind_addr,
        data_file = ?config.data_file,
        listings = config.listings.len(),
        "Configuration resolved"
    );

    // ── 2. Build shared state ────────────────────────────────────────────
    let today = chrono::Utc::now().date_naive();
    let state = Arc::new(AppState::bootstrap(config, today)?);

    // ── 3. Serve ─────────────────────────────────────────────────────────
    let bind_addr = state.config.bind_addr.clone();
    let app = api::router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server to {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    info!("Stockboard shut down complete.");
    Ok(())
}
