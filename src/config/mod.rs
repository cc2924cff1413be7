//! Configuration Module - TOML + Environment Configuration
//!
//! Loads an optional `config.toml`, then applies environment overrides
//! (a `.env` file is honored at startup). Venue credentials normally
//! come from the environment only. An absent venue base URL disables
//! every remote call and forces local simulation everywhere.

pub mod loader;

use std::time::Duration;

use serde::Deserialize;

use crate::domain::venue_request::PayloadFields;

/// Top-level dashboard configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// HTTP server settings.
  pub server: ServerConfig,
  /// Remote trading venue.
  pub venue: VenueConfig,
  /// Ledger and token-map files.
  pub persistence: PersistenceConfig,
  /// Metrics and monitoring.
  pub metrics: MetricsConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  /// Interface to bind.
  pub bind_address: String,
  /// Listen port.
  pub port: u16,
  /// Directory served as the dashboard UI.
  pub static_dir: String,
  /// Log level (trace, debug, info, warn, error).
  pub log_level: String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      bind_address: "0.0.0.0".to_string(),
      port: 3000,
      static_dir: "public".to_string(),
      log_level: "info".to_string(),
    }
  }
}

/// Remote venue configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VenueConfig {
  /// Venue base URL. `None` disables remote execution.
  pub base_url: Option<String>,
  /// Bearer token sent with every venue call.
  pub api_key: Option<String>,
  /// Per-request timeout in milliseconds.
  pub timeout_ms: u64,
  /// Endpoint paths.
  pub paths: VenuePaths,
  /// Field-name aliases for outgoing trade payloads.
  pub fields: PayloadFields,
}

impl Default for VenueConfig {
  fn default() -> Self {
    Self {
      base_url: None,
      api_key: None,
      timeout_ms: 15_000,
      paths: VenuePaths::default(),
      fields: PayloadFields::default(),
    }
  }
}

impl VenueConfig {
  /// Base URL when remote calls are enabled.
  pub fn base_url(&self) -> Option<&str> {
    self
      .base_url
      .as_deref()
      .map(str::trim)
      .filter(|url| !url.is_empty())
  }

  pub fn is_configured(&self) -> bool {
    self.base_url().is_some()
  }

  pub const fn timeout(&self) -> Duration {
    Duration::from_millis(self.timeout_ms)
  }
}

/// Venue endpoint paths, each overridable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VenuePaths {
  /// Trade execution (POST).
  pub trade: String,
  /// Account balances (GET).
  pub balances: String,
  /// Trade quote (GET).
  pub quote: String,
  /// Token price (GET).
  pub price: String,
}

impl Default for VenuePaths {
  fn default() -> Self {
    Self {
      trade: "/api/trade/execute".to_string(),
      balances: "/api/agent/balances".to_string(),
      quote: "/api/trade/quote".to_string(),
      price: "/api/price".to_string(),
    }
  }
}

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
  /// Ledger document path.
  pub data_file: String,
  /// Token mapping document path.
  pub token_map_file: String,
}

impl Default for PersistenceConfig {
  fn default() -> Self {
    Self {
      data_file: "data/portfolio.json".to_string(),
      token_map_file: "data/token_map.json".to_string(),
    }
  }
}

/// Metrics and monitoring configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
  /// Expose Prometheus metrics on `/metrics`.
  pub enabled: bool,
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self { enabled: true }
  }
}
