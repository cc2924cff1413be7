//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (HTTP client, file I/O) and exposes the use
//! cases over HTTP. Each sub-module groups adapters by infrastructure
//! concern.
//!
//! Adapter categories:
//! - `api`: Recall trading venue REST client
//! - `http`: Dashboard JSON API, CSV export and static UI
//! - `metrics`: Prometheus metrics export and health checks
//! - `persistence`: JSON ledger document and token map file

pub mod api;
pub mod http;
pub mod metrics;
pub mod persistence;
