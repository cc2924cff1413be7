//! Trade Orchestrator - Trade and Bridge Use Cases
//!
//! Turns validated requests into ledger entries:
//! - Local trades are recorded as `filled`
//! - Venue trades are quoted (best effort) then executed; any venue
//!   failure is recorded as a `simulated_fallback` trade carrying the
//!   failure detail, never surfaced as an error
//! - Without a venue, venue trades are recorded as `simulated`
//! - Dry runs return the mapped venue payload and touch nothing
//! - Bridge requests are ledger-only `relayed (simulated)` entries
//!
//! Each terminal state commits exactly one entry through the store, which
//! applies its accounting effect in the same critical section.

use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::domain::ledger::Ledger;
use crate::domain::portfolio::Portfolio;
use crate::domain::request::{BridgeRequest, TradeRequest, ValidationError};
use crate::domain::trade::{LedgerEntry, Trade, TradeStatus, Transfer};
use crate::domain::venue_request::{PayloadFields, VenueTradeRequest};
use crate::ports::execution::{ExecutionResult, TradingVenue, VenueError};
use crate::ports::repository::{LedgerStore, StoreError};
use crate::ports::token_source::TokenMapSource;

/// Chain assumed for price lookups that don't name one.
pub const DEFAULT_PRICE_CHAIN: &str = "evm";

/// Why a use case could not complete.
#[derive(Debug, Error)]
pub enum TradeError {
  /// Request is missing or has malformed fields.
  #[error(transparent)]
  Validation(#[from] ValidationError),
  /// The ledger could not be written.
  #[error(transparent)]
  Persistence(#[from] StoreError),
  /// A venue-only read was requested but no venue is configured.
  #[error("no trading venue configured")]
  VenueUnavailable,
  /// A venue read failed. Never produced by trade execution.
  #[error(transparent)]
  Venue(#[from] VenueError),
}

/// Terminal state of a venue trade request.
#[derive(Debug, Clone, PartialEq)]
pub enum TradeOutcome {
  /// No venue configured; recorded locally as `simulated`.
  Simulated(Trade),
  /// Venue executed the trade.
  Remote {
    trade: Trade,
    /// Raw venue response.
    result: Value,
  },
  /// Venue failed; recorded locally as `simulated_fallback`.
  Fallback { trade: Trade, error: VenueError },
  /// Mapped payload only; nothing executed or recorded.
  DryRun { payload: Map<String, Value> },
}

impl TradeOutcome {
  /// The recorded trade, if this outcome recorded one.
  pub const fn trade(&self) -> Option<&Trade> {
    match self {
      Self::Simulated(trade) | Self::Remote { trade, .. } | Self::Fallback { trade, .. } => {
        Some(trade)
      }
      Self::DryRun { .. } => None,
    }
  }

  /// Short label for logs and metrics.
  pub const fn label(&self) -> &'static str {
    match self {
      Self::Simulated(_) => "simulated",
      Self::Remote { .. } => "remote",
      Self::Fallback { .. } => "fallback",
      Self::DryRun { .. } => "dry_run",
    }
  }
}

/// Balance report for `GET /api/recall/balance`.
#[derive(Debug, Clone, PartialEq)]
pub enum Balances {
  /// Local portfolio, served when no venue is configured.
  Local(Portfolio),
  /// Venue response body.
  Remote(Value),
}

/// Coordinates validation, token resolution, venue calls and ledger commits.
pub struct TradeOrchestrator {
  /// Ledger persistence port.
  store: Arc<dyn LedgerStore>,
  /// Ticker → venue identifier mapping.
  tokens: Arc<dyn TokenMapSource>,
  /// Remote venue, when configured.
  venue: Option<Arc<dyn TradingVenue>>,
  /// Outgoing payload field aliases.
  fields: PayloadFields,
}

impl TradeOrchestrator {
  /// Create an orchestrator with no venue (local simulation only).
  pub fn new(store: Arc<dyn LedgerStore>, tokens: Arc<dyn TokenMapSource>) -> Self {
    Self {
      store,
      tokens,
      venue: None,
      fields: PayloadFields::default(),
    }
  }

  /// Attach a remote venue.
  #[must_use]
  pub fn with_venue(mut self, venue: Arc<dyn TradingVenue>) -> Self {
    self.venue = Some(venue);
    self
  }

  /// Override the payload field aliases.
  #[must_use]
  pub fn with_fields(mut self, fields: PayloadFields) -> Self {
    self.fields = fields;
    self
  }

  /// Whether trades go to a remote venue rather than straight to simulation.
  pub const fn venue_configured(&self) -> bool {
    self.venue.is_some()
  }

  /// Current ledger (entries + portfolio).
  pub async fn ledger(&self) -> Ledger {
    self.store.load().await
  }

  /// Record a trade locally with status `filled`. No venue involvement.
  ///
  /// # Errors
  /// `Validation` for bad input, `Persistence` if the ledger write fails.
  #[instrument(skip(self, request))]
  pub async fn record_trade(&self, request: &TradeRequest) -> Result<Trade, TradeError> {
    let ticket = request.validate()?;
    let trade = self
      .commit(Trade::record(&ticket, TradeStatus::Filled))
      .await?;
    info!(trade_id = %trade.id, amount = trade.amount, fee = trade.fee, "Trade recorded");
    Ok(trade)
  }

  /// Execute a trade on the venue, falling back to local simulation.
  ///
  /// With `dry_run`, returns the mapped venue payload without calling the
  /// venue or touching the ledger.
  ///
  /// # Errors
  /// `Validation` for bad input, `Persistence` if the ledger write fails.
  /// Venue failures are never errors here.
  #[instrument(skip(self, request), fields(venue = self.venue.is_some()))]
  pub async fn execute_trade(
    &self,
    request: &TradeRequest,
    dry_run: bool,
  ) -> Result<TradeOutcome, TradeError> {
    let ticket = request.validate()?;
    let tokens = self.tokens.token_map().await;
    let payload = self
      .fields
      .build(&VenueTradeRequest::resolve(&ticket, &tokens));

    if dry_run {
      info!(fields = payload.len(), "Dry run, returning mapped payload");
      return Ok(TradeOutcome::DryRun { payload });
    }

    let Some(venue) = &self.venue else {
      let trade = self
        .commit(Trade::record(&ticket, TradeStatus::Simulated))
        .await?;
      info!(trade_id = %trade.id, "No venue configured, trade simulated");
      return Ok(TradeOutcome::Simulated(trade));
    };

    let quote = venue.quote(&payload).await;

    match venue.execute(&payload, quote).await {
      ExecutionResult::Success(result) => {
        let mut trade = Trade::record(&ticket, venue_status(&result));
        if let Some(id) = venue_trade_id(&result) {
          trade = trade.with_id(id);
        }
        let trade = self.commit(trade).await?;
        info!(trade_id = %trade.id, status = %trade.status, "Venue executed trade");
        Ok(TradeOutcome::Remote { trade, result })
      }
      ExecutionResult::Failure(error) => {
        warn!(
          error = %error,
          kind = error.kind(),
          status = ?error.status(),
          "Venue execution failed, recording simulated fallback"
        );
        let trade = Trade::record(&ticket, TradeStatus::SimulatedFallback)
          .with_venue_error(error.to_string());
        let trade = self.commit(trade).await?;
        Ok(TradeOutcome::Fallback { trade, error })
      }
    }
  }

  /// Record a simulated bridge transfer. No portfolio effect.
  ///
  /// # Errors
  /// `Validation` for bad input, `Persistence` if the ledger write fails.
  #[instrument(skip(self, request))]
  pub async fn record_bridge(&self, request: &BridgeRequest) -> Result<Transfer, TradeError> {
    let ticket = request.validate()?;
    let transfer = Transfer::relay(&ticket);
    self
      .store
      .commit(LedgerEntry::Bridge(transfer.clone()))
      .await?;
    info!(transfer_id = %transfer.id, token = %transfer.token, amount = transfer.amount, "Bridge relayed");
    Ok(transfer)
  }

  /// Venue balances, or the local portfolio when no venue is configured.
  ///
  /// A configured venue that fails is an error, not a fallback.
  ///
  /// # Errors
  /// `Venue` when the configured venue can't be read.
  #[instrument(skip(self))]
  pub async fn balances(&self) -> Result<Balances, TradeError> {
    match &self.venue {
      None => Ok(Balances::Local(self.store.load().await.portfolio().clone())),
      Some(venue) => Ok(Balances::Remote(venue.balances().await?)),
    }
  }

  /// Venue price for `token` on `chain` (default `evm`).
  ///
  /// # Errors
  /// `Validation` without a token, `VenueUnavailable` without a venue,
  /// `Venue` when the venue can't be read.
  #[instrument(skip(self))]
  pub async fn price(&self, chain: Option<&str>, token: Option<&str>) -> Result<Value, TradeError> {
    let token = token
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .ok_or(ValidationError::Missing("token"))?;
    let chain = chain
      .map(str::trim)
      .filter(|c| !c.is_empty())
      .unwrap_or(DEFAULT_PRICE_CHAIN);
    let venue = self.venue.as_ref().ok_or(TradeError::VenueUnavailable)?;

    let tokens = self.tokens.token_map().await;
    Ok(venue.price(chain, tokens.resolve(token)).await?)
  }

  async fn commit(&self, trade: Trade) -> Result<Trade, StoreError> {
    self.store.commit(LedgerEntry::Trade(trade.clone())).await?;
    Ok(trade)
  }
}

/// Status reported by the venue, `submitted` when it doesn't say.
fn venue_status(result: &Value) -> TradeStatus {
  result
    .pointer("/transaction/status")
    .or_else(|| result.get("status"))
    .and_then(Value::as_str)
    .filter(|s| !s.is_empty())
    .map_or(TradeStatus::Submitted, |s| TradeStatus::from(s.to_string()))
}

/// Identifier assigned by the venue, if any.
fn venue_trade_id(result: &Value) -> Option<String> {
  let id = result
    .pointer("/transaction/id")
    .or_else(|| result.get("id"))?;
  match id {
    Value::String(s) if !s.is_empty() => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    _ => None,
  }
}
