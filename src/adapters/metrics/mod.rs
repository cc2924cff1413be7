//! Metrics and Monitoring Adapters
//!
//! Prometheus text export on `/metrics` and health check endpoints
//! (`/live`, `/ready`), both merged into the API router.

pub mod health;
pub mod prometheus;

pub use health::HealthRoutes;
pub use prometheus::MetricsRegistry;
