//! Ledger entry types.
//!
//! Trades and bridge transfers share one append-only sequence in the
//! ledger. Field names follow the dashboard's JSON shape (camelCase), so
//! the persisted document and the API responses carry the same objects.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::fees::FeeCalculator;

// ────────────────────────────────────────────
// Type aliases consumed by ports and adapters
// ────────────────────────────────────────────

/// Ledger entry identifier (local UUID or venue-assigned ID).
pub type EntryId = String;

/// User-facing token ticker, e.g. `USDC`.
pub type TokenSymbol = String;

/// Status recorded on every bridge transfer.
pub const BRIDGE_STATUS: &str = "relayed (simulated)";

/// Current time as an ISO-8601 UTC timestamp with millisecond precision.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn new_entry_id() -> EntryId {
    Uuid::new_v4().to_string()
}

/// Trade direction.
///
/// Only affects the venue-side `side` parameter; local accounting treats
/// both directions identically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    #[default]
    Buy,
    Sell,
}

impl TradeAction {
    /// Parse a user-supplied action, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "buy" => Some(Self::Buy),
            "sell" => Some(Self::Sell),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl std::fmt::Display for TradeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome label stored on a trade.
///
/// Venues may report statuses we do not know about; those are kept
/// verbatim in `Venue`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TradeStatus {
    /// Recorded through the plain local trade endpoint.
    Filled,
    /// Simulated because no venue is configured.
    Simulated,
    /// Simulated after the venue failed to execute.
    SimulatedFallback,
    /// Accepted by the venue without a more specific status.
    Submitted,
    /// Any other venue-defined status.
    Venue(String),
}

impl TradeStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Filled => "filled",
            Self::Simulated => "simulated",
            Self::SimulatedFallback => "simulated_fallback",
            Self::Submitted => "submitted",
            Self::Venue(status) => status,
        }
    }
}

impl From<String> for TradeStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "filled" => Self::Filled,
            "simulated" => Self::Simulated,
            "simulated_fallback" => Self::SimulatedFallback,
            "submitted" => Self::Submitted,
            _ => Self::Venue(raw),
        }
    }
}

impl From<TradeStatus> for String {
    fn from(status: TradeStatus) -> Self {
        match status {
            TradeStatus::Venue(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated trade request, before any execution outcome is known.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeTicket {
    pub from_chain: String,
    pub from_specific: String,
    pub to_chain: String,
    pub to_specific: String,
    pub action: TradeAction,
    pub from_token: TokenSymbol,
    pub to_token: TokenSymbol,
    /// Always finite and > 0.
    pub amount: f64,
    pub reason: String,
}

/// One executed (real or simulated) exchange of value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: EntryId,
    pub timestamp: String,
    pub from_chain: String,
    #[serde(default)]
    pub from_specific: String,
    pub to_chain: String,
    #[serde(default)]
    pub to_specific: String,
    pub action: TradeAction,
    pub from_token: TokenSymbol,
    pub to_token: TokenSymbol,
    pub amount: f64,
    pub fee: f64,
    #[serde(default)]
    pub reason: String,
    pub status: TradeStatus,
    /// Venue failure that forced a local fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_error: Option<String>,
}

impl Trade {
    /// Record a ticket with a fresh ID, the current time and the flat fee.
    pub fn record(ticket: &TradeTicket, status: TradeStatus) -> Self {
        Self::record_at(ticket, status, now_timestamp())
    }

    /// Same as [`Trade::record`] with an explicit timestamp.
    pub fn record_at(ticket: &TradeTicket, status: TradeStatus, timestamp: String) -> Self {
        Self {
            id: new_entry_id(),
            timestamp,
            from_chain: ticket.from_chain.clone(),
            from_specific: ticket.from_specific.clone(),
            to_chain: ticket.to_chain.clone(),
            to_specific: ticket.to_specific.clone(),
            action: ticket.action,
            from_token: ticket.from_token.clone(),
            to_token: ticket.to_token.clone(),
            amount: ticket.amount,
            fee: FeeCalculator::flat().fee(ticket.amount),
            reason: ticket.reason.clone(),
            status,
            venue_error: None,
        }
    }

    /// Replace the local ID with one assigned by the venue.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<EntryId>) -> Self {
        self.id = id.into();
        self
    }

    /// Attach the venue failure detail that caused a fallback.
    #[must_use]
    pub fn with_venue_error(mut self, detail: impl Into<String>) -> Self {
        self.venue_error = Some(detail.into());
        self
    }
}

/// A validated bridge request.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeTicket {
    pub from_chain: String,
    pub from_specific: String,
    pub to_chain: String,
    pub to_specific: String,
    /// Never empty.
    pub token: TokenSymbol,
    /// Always finite and > 0.
    pub amount: f64,
}

/// A cross-network relocation of a single token. Ledger-only: it has no
/// portfolio effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub id: EntryId,
    pub timestamp: String,
    #[serde(default)]
    pub from_chain: String,
    #[serde(default)]
    pub from_specific: String,
    #[serde(default)]
    pub to_chain: String,
    #[serde(default)]
    pub to_specific: String,
    pub token: TokenSymbol,
    pub amount: f64,
    pub status: String,
}

impl Transfer {
    /// Record a bridge ticket as a simulated relay.
    pub fn relay(ticket: &BridgeTicket) -> Self {
        Self {
            id: new_entry_id(),
            timestamp: now_timestamp(),
            from_chain: ticket.from_chain.clone(),
            from_specific: ticket.from_specific.clone(),
            to_chain: ticket.to_chain.clone(),
            to_specific: ticket.to_specific.clone(),
            token: ticket.token.clone(),
            amount: ticket.amount,
            status: BRIDGE_STATUS.to_string(),
        }
    }
}

/// One element of the ledger's entry sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LedgerEntry {
    Trade(Trade),
    Bridge(Transfer),
}

impl LedgerEntry {
    pub fn id(&self) -> &str {
        match self {
            Self::Trade(trade) => &trade.id,
            Self::Bridge(transfer) => &transfer.id,
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Trade(_) => "trade",
            Self::Bridge(_) => "bridge",
        }
    }

    pub fn status(&self) -> &str {
        match self {
            Self::Trade(trade) => trade.status.as_str(),
            Self::Bridge(transfer) => &transfer.status,
        }
    }

    pub fn timestamp(&self) -> &str {
        match self {
            Self::Trade(trade) => &trade.timestamp,
            Self::Bridge(transfer) => &transfer.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket() -> TradeTicket {
        TradeTicket {
            from_chain: "evm".to_string(),
            from_specific: "eth".to_string(),
            to_chain: "evm".to_string(),
            to_specific: "base".to_string(),
            action: TradeAction::Buy,
            from_token: "USDC".to_string(),
            to_token: "ETH".to_string(),
            amount: 1.0,
            reason: "rebalance".to_string(),
        }
    }

    #[test]
    fn test_record_computes_fee_and_status() {
        let trade = Trade::record(&ticket(), TradeStatus::Filled);
        assert_eq!(trade.fee, 0.001);
        assert_eq!(trade.status, TradeStatus::Filled);
        assert!(trade.venue_error.is_none());
        assert!(!trade.id.is_empty());
        assert!(trade.timestamp.ends_with('Z'));
    }

    #[test]
    fn test_record_ids_are_unique() {
        let a = Trade::record(&ticket(), TradeStatus::Filled);
        let b = Trade::record(&ticket(), TradeStatus::Filled);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_trade_serializes_camel_case_with_type_tag() {
        let entry = LedgerEntry::Trade(
            Trade::record(&ticket(), TradeStatus::SimulatedFallback)
                .with_venue_error("venue transport failure: timed out"),
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "trade");
        assert_eq!(json["fromToken"], "USDC");
        assert_eq!(json["status"], "simulated_fallback");
        assert_eq!(json["venueError"], "venue transport failure: timed out");
    }

    #[test]
    fn test_venue_error_omitted_when_absent() {
        let json = serde_json::to_value(Trade::record(&ticket(), TradeStatus::Filled)).unwrap();
        assert!(json.get("venueError").is_none());
    }

    #[test]
    fn test_unknown_status_kept_verbatim() {
        let status: TradeStatus = serde_json::from_str("\"pending_settlement\"").unwrap();
        assert_eq!(status, TradeStatus::Venue("pending_settlement".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"pending_settlement\"");
    }

    #[test]
    fn test_action_parse() {
        assert_eq!(TradeAction::parse(" SELL "), Some(TradeAction::Sell));
        assert_eq!(TradeAction::parse("buy"), Some(TradeAction::Buy));
        assert_eq!(TradeAction::parse("hold"), None);
    }

    #[test]
    fn test_bridge_entry_round_trip() {
        let transfer = Transfer::relay(&BridgeTicket {
            from_chain: "evm".to_string(),
            from_specific: "eth".to_string(),
            to_chain: "evm".to_string(),
            to_specific: "arbitrum".to_string(),
            token: "USDC".to_string(),
            amount: 25.0,
        });
        let entry = LedgerEntry::Bridge(transfer);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"type\":\"bridge\""));
        let back: LedgerEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
        assert_eq!(back.status(), BRIDGE_STATUS);
    }
}
