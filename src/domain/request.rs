//! Inbound trade and bridge requests.
//!
//! Requests arrive in the dashboard's loose JSON shape (every field
//! optional, `amount` as a number or numeric string) and are validated
//! into tickets before anything else happens.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::trade::{BridgeTicket, TradeAction, TradeTicket};

/// Why a request was refused before touching the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    Missing(&'static str),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("invalid action: {0} (expected buy or sell)")]
    InvalidAction(String),
}

/// `POST /api/trade` and `POST /api/recall/trade` body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TradeRequest {
    pub from_chain: Option<String>,
    pub from_specific: Option<String>,
    pub to_chain: Option<String>,
    pub to_specific: Option<String>,
    pub action: Option<String>,
    pub from_token: Option<String>,
    pub to_token: Option<String>,
    pub amount: Option<Value>,
    pub reason: Option<String>,
}

impl TradeRequest {
    /// Check required fields (amount, source and destination network).
    ///
    /// # Errors
    /// Returns a [`ValidationError`] naming the first offending field.
    pub fn validate(&self) -> Result<TradeTicket, ValidationError> {
        let amount = parse_amount(self.amount.as_ref())?;
        let from_chain = required(self.from_chain.as_deref(), "fromChain")?;
        let to_chain = required(self.to_chain.as_deref(), "toChain")?;
        let action = match optional(self.action.as_deref()) {
            None => TradeAction::default(),
            Some(raw) => TradeAction::parse(&raw)
                .ok_or_else(|| ValidationError::InvalidAction(raw))?,
        };

        Ok(TradeTicket {
            from_chain,
            from_specific: optional(self.from_specific.as_deref()).unwrap_or_default(),
            to_chain,
            to_specific: optional(self.to_specific.as_deref()).unwrap_or_default(),
            action,
            from_token: optional(self.from_token.as_deref()).unwrap_or_default(),
            to_token: optional(self.to_token.as_deref()).unwrap_or_default(),
            amount,
            reason: self.reason.clone().unwrap_or_default(),
        })
    }
}

/// `POST /api/bridge` body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BridgeRequest {
    pub from_chain: Option<String>,
    pub from_specific: Option<String>,
    pub to_chain: Option<String>,
    pub to_specific: Option<String>,
    pub token: Option<String>,
    pub amount: Option<Value>,
}

impl BridgeRequest {
    /// Check required fields (token and amount).
    ///
    /// # Errors
    /// Returns a [`ValidationError`] naming the first offending field.
    pub fn validate(&self) -> Result<BridgeTicket, ValidationError> {
        let token = required(self.token.as_deref(), "token")?;
        let amount = parse_amount(self.amount.as_ref())?;
        Ok(BridgeTicket {
            from_chain: optional(self.from_chain.as_deref()).unwrap_or_default(),
            from_specific: optional(self.from_specific.as_deref()).unwrap_or_default(),
            to_chain: optional(self.to_chain.as_deref()).unwrap_or_default(),
            to_specific: optional(self.to_specific.as_deref()).unwrap_or_default(),
            token,
            amount,
        })
    }
}

/// Largest accepted trade or bridge amount. Keeps every fee exact in
/// `Decimal` and every running balance finite.
pub const MAX_TRADE_AMOUNT: f64 = 1e15;

/// Accepts `1`, `1.5`, `"1.5"`. Rejects null, blanks, non-finite,
/// non-positive and values above [`MAX_TRADE_AMOUNT`].
///
/// # Errors
/// [`ValidationError::Missing`] when absent, otherwise
/// [`ValidationError::InvalidAmount`].
pub fn parse_amount(raw: Option<&Value>) -> Result<f64, ValidationError> {
    let amount = match raw {
        None | Some(Value::Null) => return Err(ValidationError::Missing("amount")),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s.trim().is_empty() => {
            return Err(ValidationError::Missing("amount"));
        }
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    match amount {
        Some(v) if v.is_finite() && v > 0.0 && v <= MAX_TRADE_AMOUNT => Ok(v),
        _ => Err(ValidationError::InvalidAmount(
            raw.map(ToString::to_string).unwrap_or_default(),
        )),
    }
}

fn optional(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

fn required(raw: Option<&str>, field: &'static str) -> Result<String, ValidationError> {
    optional(raw).ok_or(ValidationError::Missing(field))
}
