//! Trading Venue Port - Remote Execution Interface
//!
//! Defines the trait for talking to an optional remote trading venue:
//! balance reads, best-effort quotes, trade execution and price lookups.
//!
//! Key design decisions:
//! - `quote` never fails: a failed quote is "no quote available"
//! - `execute` never raises: every outcome is an `ExecutionResult`
//! - Rejections (venue answered with a non-success status) and transport
//!   failures (no answer at all) stay distinguishable

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// Failure talking to the venue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VenueError {
  /// The venue answered with a non-success status.
  #[error("venue rejected request with HTTP {status}: {body}")]
  Rejected {
    /// HTTP status code returned by the venue.
    status: u16,
    /// Raw response body.
    body: String,
  },
  /// Connection, DNS or timeout failure; no status available.
  #[error("venue transport failure: {0}")]
  Transport(String),
}

impl VenueError {
  /// HTTP status, when the venue answered at all.
  pub const fn status(&self) -> Option<u16> {
    match self {
      Self::Rejected { status, .. } => Some(*status),
      Self::Transport(_) => None,
    }
  }

  /// Short label for logs and metrics.
  pub const fn kind(&self) -> &'static str {
    match self {
      Self::Rejected { .. } => "rejected",
      Self::Transport(_) => "transport",
    }
  }
}

/// Venue-provided price/routing estimate, kept as the raw response body.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
  pub data: Value,
}

/// Outcome of an execution attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult {
  /// Venue accepted the trade; carries its response body.
  Success(Value),
  /// Venue rejected the trade or could not be reached.
  Failure(VenueError),
}

/// Trait for remote trading venues.
///
/// Payloads arrive already mapped into the venue's field names; the
/// implementor only handles transport, auth and response decoding.
#[async_trait]
pub trait TradingVenue: Send + Sync + 'static {
  /// Fetch account balances from the venue.
  ///
  /// # Errors
  /// Any rejection or transport failure. The caller owns fallback policy.
  async fn balances(&self) -> Result<Value, VenueError>;

  /// Request a quote for a mapped trade payload. Failures are logged and
  /// reported as `None`.
  async fn quote(&self, payload: &Map<String, Value>) -> Option<Quote>;

  /// Execute a mapped trade, merging `quote` into the payload when present.
  async fn execute(&self, payload: &Map<String, Value>, quote: Option<Quote>) -> ExecutionResult;

  /// Look up the venue price of `token` on `chain`.
  ///
  /// # Errors
  /// Any rejection or transport failure.
  async fn price(&self, chain: &str, token: &str) -> Result<Value, VenueError>;
}
