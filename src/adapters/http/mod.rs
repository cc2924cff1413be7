//! Dashboard HTTP API - axum 0.7 Router
//!
//! JSON endpoints under `/api`, CSV export, health checks and metrics, with the
//! static dashboard UI served as the fallback. CORS is permissive.

use std::path::Path;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::adapters::metrics::{HealthRoutes, MetricsRegistry};
use crate::ports::repository::LedgerStore;
use crate::usecases::TradeOrchestrator;

pub mod error;
pub mod export;
pub mod handlers;

pub use error::ApiError;

/// State shared by all API handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<TradeOrchestrator>,
    pub metrics: Arc<MetricsRegistry>,
}

/// Build the full application router. `/metrics` is mounted only when
/// `expose_metrics` is set.
pub fn router(
    state: AppState,
    store: Arc<dyn LedgerStore>,
    static_dir: impl AsRef<Path>,
    expose_metrics: bool,
) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let metrics = Arc::clone(&state.metrics);

    let mut app = Router::new()
        .route("/api/trade", post(handlers::record_trade))
        .route("/api/trades", get(handlers::list_trades))
        .route("/api/trades/export", get(handlers::export_trades))
        .route("/api/portfolio", get(handlers::portfolio))
        .route("/api/bridge", post(handlers::bridge))
        .route("/api/recall/balance", get(handlers::recall_balance))
        .route("/api/recall/trade", post(handlers::recall_trade))
        .route("/api/recall/price", get(handlers::recall_price))
        .with_state(state)
        .merge(HealthRoutes::router(store));

    if expose_metrics {
        app = app.merge(metrics.routes());
    }

    app.fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
