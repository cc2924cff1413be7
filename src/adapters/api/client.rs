//! Recall HTTP Client - Trading Venue REST Adapter
//!
//! Implements the `TradingVenue` port over reqwest. Every call carries
//! a bounded timeout. A call that fails at the transport level is tried
//! exactly once more on a bare HTTP/1.1 client without pooling, to rule
//! out connection reuse or protocol negotiation problems; there is no
//! further retry and no backoff.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::config::{VenueConfig, VenuePaths};
use crate::ports::execution::{ExecutionResult, Quote, TradingVenue, VenueError};

/// Configuration for the Recall HTTP client.
#[derive(Clone)]
pub struct RecallClientConfig {
  /// Base URL for the venue API.
  pub base_url: String,
  /// Bearer token, if the venue requires one.
  pub api_key: Option<String>,
  /// Request timeout.
  pub timeout: Duration,
  /// Endpoint paths.
  pub paths: VenuePaths,
}

impl std::fmt::Debug for RecallClientConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RecallClientConfig")
      .field("base_url", &self.base_url)
      .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
      .field("timeout", &self.timeout)
      .field("paths", &self.paths)
      .finish()
  }
}

impl RecallClientConfig {
  /// Client settings from venue config; `None` when no base URL is set.
  pub fn from_venue(venue: &VenueConfig) -> Option<Self> {
    let base_url = venue.base_url()?.trim_end_matches('/').to_string();
    Some(Self {
      base_url,
      api_key: venue.api_key.clone().filter(|k| !k.trim().is_empty()),
      timeout: venue.timeout(),
      paths: venue.paths.clone(),
    })
  }
}

/// HTTP client for the Recall trading API.
pub struct RecallClient {
  /// Pooled primary client.
  http: Client,
  /// Bare HTTP/1.1 client used once when the primary fails in transport.
  fallback: Client,
  /// Client configuration.
  config: RecallClientConfig,
}

impl RecallClient {
  /// Create a new venue client.
  ///
  /// # Errors
  /// Returns error if either underlying HTTP client can't be built.
  pub fn new(config: RecallClientConfig) -> Result<Self> {
    let http = Client::builder()
      .timeout(config.timeout)
      .connect_timeout(config.timeout)
      .pool_max_idle_per_host(5)
      .user_agent(concat!("recall-dashboard/", env!("CARGO_PKG_VERSION")))
      .build()
      .context("Failed to build HTTP client")?;

    let fallback = Client::builder()
      .timeout(config.timeout)
      .connect_timeout(config.timeout)
      .http1_only()
      .pool_max_idle_per_host(0)
      .build()
      .context("Failed to build fallback HTTP client")?;

    info!(
      base_url = %config.base_url,
      timeout_ms = config.timeout.as_millis(),
      authenticated = config.api_key.is_some(),
      "Recall venue client ready"
    );

    Ok(Self {
      http,
      fallback,
      config,
    })
  }

  pub const fn config(&self) -> &RecallClientConfig {
    &self.config
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url, path)
  }

  fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
    match &self.config.api_key {
      Some(key) => request.bearer_auth(key),
      None => request,
    }
  }

  /// Send a request built by `build`, retrying once on the fallback
  /// client if the primary never got a response.
  async fn send<F>(&self, operation: &'static str, build: F) -> Result<Value, VenueError>
  where
    F: Fn(&Client) -> RequestBuilder,
  {
    let response = match self.authorize(build(&self.http)).send().await {
      Ok(response) => response,
      Err(primary) => {
        warn!(operation, error = %primary, "Venue request failed, retrying on fallback transport");
        match self.authorize(build(&self.fallback)).send().await {
          Ok(response) => response,
          Err(e) => {
            return Err(VenueError::Transport(format!(
              "{operation}: {e} (primary: {primary})"
            )));
          }
        }
      }
    };

    Self::decode(operation, response).await
  }

  /// Turn a response into a JSON body or a rejection.
  async fn decode(operation: &'static str, response: Response) -> Result<Value, VenueError> {
    let status = response.status();
    let text = response
      .text()
      .await
      .map_err(|e| VenueError::Transport(format!("{operation}: failed to read body: {e}")))?;

    if !status.is_success() {
      return Err(VenueError::Rejected {
        status: status.as_u16(),
        body: text,
      });
    }

    let body = if text.trim().is_empty() {
      Value::Null
    } else {
      serde_json::from_str(&text).unwrap_or(Value::String(text))
    };

    // Some venue endpoints report failure in a 2xx body.
    if body.get("success") == Some(&Value::Bool(false)) {
      return Err(VenueError::Rejected {
        status: status.as_u16(),
        body: body.to_string(),
      });
    }

    debug!(operation, status = status.as_u16(), "Venue request succeeded");
    Ok(body)
  }
}

/// Payload values flattened into query parameters.
fn query_pairs(payload: &Map<String, Value>) -> Vec<(String, String)> {
  payload
    .iter()
    .map(|(k, v)| {
      let value = match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
      };
      (k.clone(), value)
    })
    .collect()
}

#[async_trait]
impl TradingVenue for RecallClient {
  #[instrument(skip(self))]
  async fn balances(&self) -> Result<Value, VenueError> {
    let url = self.url(&self.config.paths.balances);
    self.send("balances", |client| client.get(&url)).await
  }

  #[instrument(skip(self, payload))]
  async fn quote(&self, payload: &Map<String, Value>) -> Option<Quote> {
    let url = self.url(&self.config.paths.quote);
    let query = query_pairs(payload);
    match self
      .send("quote", |client| client.get(&url).query(&query))
      .await
    {
      Ok(data) => Some(Quote { data }),
      Err(e) => {
        warn!(error = %e, "Quote unavailable, executing without one");
        None
      }
    }
  }

  #[instrument(skip(self, payload, quote), fields(quoted = quote.is_some()))]
  async fn execute(&self, payload: &Map<String, Value>, quote: Option<Quote>) -> ExecutionResult {
    let url = self.url(&self.config.paths.trade);
    let mut body = payload.clone();
    if let Some(quote) = quote {
      body.insert("quote".to_string(), quote.data);
    }
    let body = Value::Object(body);

    match self
      .send("execute", |client| client.post(&url).json(&body))
      .await
    {
      Ok(data) => ExecutionResult::Success(data),
      Err(e) => {
        warn!(error = %e, kind = e.kind(), "Venue execution failed");
        ExecutionResult::Failure(e)
      }
    }
  }

  #[instrument(skip(self))]
  async fn price(&self, chain: &str, token: &str) -> Result<Value, VenueError> {
    let url = self.url(&self.config.paths.price);
    self
      .send("price", |client| {
        client.get(&url).query(&[("token", token), ("chain", chain)])
      })
      .await
  }
}
