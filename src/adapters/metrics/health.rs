//! Health Checks - Liveness and Readiness
//!
//! Exposes /live and /ready via axum 0.7 for container health checks.
//! Readiness depends on the ledger file being writable.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tracing::warn;

use crate::ports::repository::LedgerStore;

/// Liveness and readiness routes over a ledger store.
pub struct HealthRoutes;

impl HealthRoutes {
    /// Build the health router, ready to merge into the API router.
    pub fn router(store: Arc<dyn LedgerStore>) -> Router {
        Router::new()
            .route("/live", get(Self::liveness))
            .route("/ready", get(Self::readiness))
            .with_state(store)
    }

    /// Liveness: always returns 200 if the process is running.
    async fn liveness() -> impl IntoResponse {
        (StatusCode::OK, "OK")
    }

    /// Readiness: returns 200 only if the ledger store accepts writes.
    async fn readiness(State(store): State<Arc<dyn LedgerStore>>) -> impl IntoResponse {
        if store.is_healthy().await {
            (StatusCode::OK, "READY")
        } else {
            warn!("Readiness check failed, ledger store not writable");
            (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
        }
    }
}
