//! Configuration Loader - File Loading, Env Overrides and Validation
//!
//! Handles loading `config.toml` (optional), layering environment
//! variables on top, and providing clear error messages for
//! misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Load configuration from `path` (if present) plus the process environment.
///
/// # Errors
/// Returns detailed error if:
/// - The file exists but can't be read or parsed
/// - An environment override has the wrong type
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let mut config = read_file(Path::new(path))?;
  apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
  validate_config(&config)?;

  info!(
    port = config.server.port,
    data_file = %config.persistence.data_file,
    venue_configured = config.venue.is_configured(),
    timeout_ms = config.venue.timeout_ms,
    "Configuration loaded successfully"
  );

  Ok(config)
}

fn read_file(path: &Path) -> Result<AppConfig> {
  if !path.exists() {
    info!(path = %path.display(), "No config file found, using defaults");
    return Ok(AppConfig::default());
  }

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  toml::from_str(&content)
    .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Layer environment variables over `config`.
///
/// `lookup` abstracts `std::env::var` so tests can supply their own
/// environment.
///
/// # Errors
/// Returns an error if a numeric variable does not parse.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<()>
where
  F: Fn(&str) -> Option<String>,
{
  let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

  if let Some(port) = get("PORT") {
    config.server.port = port
      .trim()
      .parse()
      .with_context(|| format!("PORT must be a port number, got {port:?}"))?;
  }
  if let Some(addr) = get("BIND_ADDRESS") {
    config.server.bind_address = addr;
  }
  if let Some(dir) = get("STATIC_DIR") {
    config.server.static_dir = dir;
  }
  if let Some(level) = get("LOG_LEVEL") {
    config.server.log_level = level;
  }
  if let Some(file) = get("DATA_FILE") {
    config.persistence.data_file = file;
  }
  if let Some(file) = get("TOKEN_MAP_FILE") {
    config.persistence.token_map_file = file;
  }

  // An explicitly empty RECALL_API_URL still disables the venue.
  if let Some(url) = lookup("RECALL_API_URL") {
    config.venue.base_url = Some(url).filter(|u| !u.trim().is_empty());
  }
  if let Some(key) = get("RECALL_API_KEY") {
    config.venue.api_key = Some(key);
  }
  if let Some(ms) = get("RECALL_TIMEOUT_MS") {
    config.venue.timeout_ms = ms
      .trim()
      .parse()
      .with_context(|| format!("RECALL_TIMEOUT_MS must be milliseconds, got {ms:?}"))?;
  }
  if let Some(path) = get("RECALL_TRADE_PATH") {
    config.venue.paths.trade = path;
  }
  if let Some(path) = get("RECALL_BALANCE_PATH") {
    config.venue.paths.balances = path;
  }
  if let Some(path) = get("RECALL_QUOTE_PATH") {
    config.venue.paths.quote = path;
  }
  if let Some(path) = get("RECALL_PRICE_PATH") {
    config.venue.paths.price = path;
  }

  Ok(())
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - A bounded, positive venue timeout
/// - Endpoint paths rooted at `/`
/// - At least one alias per payload field
/// - Non-empty persistence paths
pub fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    config.venue.timeout_ms > 0,
    "Venue timeout must be positive, got {}",
    config.venue.timeout_ms
  );

  let paths = &config.venue.paths;
  for (name, path) in [
    ("trade", &paths.trade),
    ("balances", &paths.balances),
    ("quote", &paths.quote),
    ("price", &paths.price),
  ] {
    anyhow::ensure!(
      path.starts_with('/'),
      "Venue {name} path must start with '/', got {path:?}"
    );
  }

  if let Some(field) = config.venue.fields.first_empty() {
    anyhow::bail!("Venue payload field {field} has no alias configured");
  }

  if let Some(url) = config.venue.base_url() {
    anyhow::ensure!(
      url.starts_with("http://") || url.starts_with("https://"),
      "Venue base URL must be http(s), got {url:?}"
    );
  }

  anyhow::ensure!(
    !config.persistence.data_file.trim().is_empty(),
    "Ledger data file path must not be empty"
  );

  Ok(())
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use super::*;

  fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
      .iter()
      .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
      .collect();
    move |key: &str| map.get(key).cloned()
  }

  #[test]
  fn test_missing_file_uses_defaults() {
    let config = read_file(Path::new("definitely-not-here.toml")).unwrap();
    assert_eq!(config.server.port, 3000);
    assert!(!config.venue.is_configured());
    assert!(validate_config(&config).is_ok());
  }

  #[test]
  fn test_env_overrides() {
    let mut config = AppConfig::default();
    apply_env_overrides(
      &mut config,
      env(&[
        ("PORT", "8081"),
        ("DATA_FILE", "/tmp/ledger.json"),
        ("RECALL_API_URL", "https://api.example.test"),
        ("RECALL_API_KEY", "secret"),
        ("RECALL_TRADE_PATH", "/v2/trade"),
        ("RECALL_TIMEOUT_MS", "2500"),
      ]),
    )
    .unwrap();

    assert_eq!(config.server.port, 8081);
    assert_eq!(config.persistence.data_file, "/tmp/ledger.json");
    assert_eq!(config.venue.base_url(), Some("https://api.example.test"));
    assert_eq!(config.venue.api_key.as_deref(), Some("secret"));
    assert_eq!(config.venue.paths.trade, "/v2/trade");
    assert_eq!(config.venue.paths.balances, "/api/agent/balances");
    assert_eq!(config.venue.timeout_ms, 2500);
    assert!(validate_config(&config).is_ok());
  }

  #[test]
  fn test_empty_base_url_disables_venue() {
    let mut config = AppConfig::default();
    config.venue.base_url = Some("https://from-file.test".to_string());
    apply_env_overrides(&mut config, env(&[("RECALL_API_URL", "  ")])).unwrap();
    assert!(!config.venue.is_configured());
  }

  #[test]
  fn test_bad_port_is_error() {
    let mut config = AppConfig::default();
    assert!(apply_env_overrides(&mut config, env(&[("PORT", "eighty")])).is_err());
  }

  #[test]
  fn test_toml_sections() {
    let config: AppConfig = toml::from_str(
      r#"
        [server]
        port = 4000

        [venue]
        base_url = "http://localhost:9000"
        timeout_ms = 500

        [venue.paths]
        quote = "/quote"

        [venue.fields]
        amount = ["amount", "amountIn"]
      "#,
    )
    .unwrap();

    assert_eq!(config.server.port, 4000);
    assert_eq!(config.venue.timeout_ms, 500);
    assert_eq!(config.venue.paths.quote, "/quote");
    assert_eq!(config.venue.paths.trade, "/api/trade/execute");
    assert_eq!(config.venue.fields.amount, vec!["amount", "amountIn"]);
    assert_eq!(config.venue.fields.side, vec!["side"]);
    assert!(validate_config(&config).is_ok());
  }

  #[test]
  fn test_validation_rejects_bad_values() {
    let mut config = AppConfig::default();
    config.venue.timeout_ms = 0;
    assert!(validate_config(&config).is_err());

    let mut config = AppConfig::default();
    config.venue.paths.price = "price".to_string();
    assert!(validate_config(&config).is_err());

    let mut config = AppConfig::default();
    config.venue.fields.reason.clear();
    assert!(validate_config(&config).is_err());

    let mut config = AppConfig::default();
    config.venue.base_url = Some("ftp://nope".to_string());
    assert!(validate_config(&config).is_err());
  }
}
