//! Recall Dashboard — Entry Point
//!
//! Initializes configuration, logging, the ledger store and the optional
//! Recall venue client, then serves the dashboard API until SIGINT.
//!
//! Wiring sequence:
//! 1. Load .env, then config.toml (or `CONFIG_PATH`) + env overrides
//! 2. Init tracing (JSON structured logging, `LOG_FORMAT=pretty` for humans)
//! 3. Open the JSON ledger store and token map file
//! 4. Create the RecallClient when `RECALL_API_URL` is set
//! 5. Build the TradeOrchestrator and metrics registry
//! 6. Serve the axum router (API + health checks + metrics + static UI)
//! 7. Wait for SIGINT → graceful shutdown

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use recall_dashboard::adapters::api::{RecallClient, RecallClientConfig};
use recall_dashboard::adapters::http::{self, AppState};
use recall_dashboard::adapters::metrics::MetricsRegistry;
use recall_dashboard::adapters::persistence::{JsonFileStore, TokenMapFile};
use recall_dashboard::config::loader::load_config;
use recall_dashboard::ports::repository::LedgerStore;
use recall_dashboard::usecases::TradeOrchestrator;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    dotenvy::dotenv().ok();
    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let config = load_config(&config_path).context("Failed to load configuration")?;

    // ── 2. Initialize structured logging ────────────────────
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("pretty")) {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        venue_configured = config.venue.is_configured(),
        "Starting Recall Dashboard"
    );

    // ── 3. Ledger store + token map ─────────────────────────
    let ledger_file = JsonFileStore::open(&config.persistence.data_file)
        .await
        .context("Failed to open ledger document")?;
    info!(data_file = %ledger_file.path().display(), "Ledger document opened");
    let store: Arc<dyn LedgerStore> = Arc::new(ledger_file);
    let tokens = Arc::new(TokenMapFile::new(&config.persistence.token_map_file));

    // ── 4. Optional venue client ────────────────────────────
    let mut orchestrator = TradeOrchestrator::new(Arc::clone(&store), tokens)
        .with_fields(config.venue.fields.clone());
    match RecallClientConfig::from_venue(&config.venue) {
        Some(client_config) => {
            let client = RecallClient::new(client_config).context("Failed to create Recall client")?;
            orchestrator = orchestrator.with_venue(Arc::new(client));
        }
        None => warn!("RECALL_API_URL not set, venue trades will be simulated locally"),
    }

    // ── 5. Metrics ──────────────────────────────────────────
    let metrics = Arc::new(MetricsRegistry::new().context("Failed to register metrics")?);

    // ── 6. Serve ────────────────────────────────────────────
    let state = AppState {
        orchestrator: Arc::new(orchestrator),
        metrics,
    };
    let app = http::router(
        state,
        store,
        &config.server.static_dir,
        config.metrics.enabled,
    );

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(address = %addr, static_dir = %config.server.static_dir, "Dashboard listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Shutdown complete");
    Ok(())
}

/// Resolves on SIGINT.
async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("SIGINT received, initiating graceful shutdown"),
        Err(e) => warn!(error = %e, "Failed to listen for SIGINT"),
    }
}
