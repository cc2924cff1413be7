//! Prometheus Metrics Registry - Dashboard Observability
//!
//! Registers the dashboard's counters and exposes them in text format on
//! `GET /metrics`, mounted on the main API router. Covers ledger growth,
//! venue call outcomes, fallbacks and handler latency.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};
use tracing::warn;

/// Centralized Prometheus metrics for the dashboard.
///
/// All metrics follow the naming convention `recall_dashboard_*`.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Entries appended to the ledger, by kind and status.
    pub ledger_entries: IntCounterVec,
    /// Venue calls, by operation and outcome.
    pub venue_calls: IntCounterVec,
    /// Venue trades recorded as simulated fallbacks.
    pub trade_fallbacks: IntCounter,
    /// API handler latency in milliseconds.
    pub request_latency_ms: HistogramVec,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    ///
    /// # Errors
    /// Returns error if a metric definition is invalid or registered twice.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let ledger_entries = IntCounterVec::new(
            Opts::new(
                "recall_dashboard_ledger_entries_total",
                "Ledger entries appended",
            ),
            &["kind", "status"],
        )?;

        let venue_calls = IntCounterVec::new(
            Opts::new(
                "recall_dashboard_venue_calls_total",
                "Calls made to the trading venue",
            ),
            &["operation", "outcome"],
        )?;

        let trade_fallbacks = IntCounter::new(
            "recall_dashboard_trade_fallbacks_total",
            "Venue trades recorded as simulated fallbacks",
        )?;

        let request_latency_ms = HistogramVec::new(
            HistogramOpts::new(
                "recall_dashboard_request_latency_ms",
                "API handler latency in milliseconds",
            )
            .buckets(vec![1.0, 5.0, 25.0, 100.0, 500.0, 2000.0, 10000.0]),
            &["route"],
        )?;

        registry.register(Box::new(ledger_entries.clone()))?;
        registry.register(Box::new(venue_calls.clone()))?;
        registry.register(Box::new(trade_fallbacks.clone()))?;
        registry.register(Box::new(request_latency_ms.clone()))?;

        Ok(Self {
            registry,
            ledger_entries,
            venue_calls,
            trade_fallbacks,
            request_latency_ms,
        })
    }

    /// Count one appended ledger entry.
    pub fn record_entry(&self, kind: &str, status: &str) {
        self.ledger_entries.with_label_values(&[kind, status]).inc();
    }

    /// Count one venue call.
    pub fn record_venue_call(&self, operation: &str, outcome: &str) {
        self.venue_calls
            .with_label_values(&[operation, outcome])
            .inc();
    }

    /// Observe handler latency.
    pub fn observe_latency(&self, route: &str, elapsed: std::time::Duration) {
        self.request_latency_ms
            .with_label_values(&[route])
            .observe(elapsed.as_secs_f64() * 1000.0);
    }

    /// Encode all metrics in Prometheus text format.
    ///
    /// # Errors
    /// Returns error if encoding fails.
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// `GET /metrics` route, ready to merge into the API router.
    pub fn routes(self: Arc<Self>) -> Router {
        Router::new()
            .route("/metrics", get(Self::scrape))
            .with_state(self)
    }

    async fn scrape(State(metrics): State<Arc<Self>>) -> impl IntoResponse {
        match metrics.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
                body,
            )
                .into_response(),
            Err(e) => {
                warn!(error = %e, "Failed to encode metrics");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_recorded_counters() {
        let metrics = MetricsRegistry::new().unwrap();
        metrics.record_entry("trade", "simulated_fallback");
        metrics.record_venue_call("execute", "failure");
        metrics.trade_fallbacks.inc();

        let text = metrics.render().unwrap();
        assert!(text.contains("recall_dashboard_ledger_entries_total"));
        assert!(text.contains("status=\"simulated_fallback\""));
        assert!(text.contains("recall_dashboard_venue_calls_total"));
        assert!(text.contains("recall_dashboard_trade_fallbacks_total 1"));
    }
}
