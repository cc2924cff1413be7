//! Venue payload mapping.
//!
//! Rewrites a validated trade into the venue's request shape. The venue's
//! API has not been consistent about field names, so each logical field
//! is written under every alias in [`PayloadFields`]. The alias sets are
//! configuration, not code.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::tokens::TokenMap;
use super::trade::{TradeAction, TradeTicket};

/// A trade with both tokens resolved to venue identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueTradeRequest {
    pub from_chain: String,
    pub from_specific: String,
    pub to_chain: String,
    pub to_specific: String,
    pub side: TradeAction,
    pub from_token: String,
    pub to_token: String,
    pub amount: f64,
    pub reason: String,
}

impl VenueTradeRequest {
    /// Resolve the ticket's tokens through `tokens`.
    pub fn resolve(ticket: &TradeTicket, tokens: &TokenMap) -> Self {
        Self {
            from_chain: ticket.from_chain.clone(),
            from_specific: ticket.from_specific.clone(),
            to_chain: ticket.to_chain.clone(),
            to_specific: ticket.to_specific.clone(),
            side: ticket.action,
            from_token: tokens.resolve(&ticket.from_token).to_string(),
            to_token: tokens.resolve(&ticket.to_token).to_string(),
            amount: ticket.amount,
            reason: ticket.reason.clone(),
        }
    }
}

/// Field-name aliases written for each logical payload field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayloadFields {
    pub from_token: Vec<String>,
    pub to_token: Vec<String>,
    pub amount: Vec<String>,
    pub from_chain: Vec<String>,
    pub from_specific: Vec<String>,
    pub to_chain: Vec<String>,
    pub to_specific: Vec<String>,
    pub side: Vec<String>,
    pub reason: Vec<String>,
}

fn names(aliases: &[&str]) -> Vec<String> {
    aliases.iter().map(|s| (*s).to_string()).collect()
}

impl Default for PayloadFields {
    fn default() -> Self {
        Self {
            from_token: names(&["fromToken", "from_token"]),
            to_token: names(&["toToken", "to_token"]),
            amount: names(&["amount"]),
            from_chain: names(&["fromChain"]),
            from_specific: names(&["fromSpecificChain", "fromSpecific"]),
            to_chain: names(&["toChain"]),
            to_specific: names(&["toSpecificChain", "toSpecific"]),
            side: names(&["side"]),
            reason: names(&["reason"]),
        }
    }
}

impl PayloadFields {
    /// Name of the first logical field with no alias, if any.
    pub fn first_empty(&self) -> Option<&'static str> {
        [
            ("from_token", &self.from_token),
            ("to_token", &self.to_token),
            ("amount", &self.amount),
            ("from_chain", &self.from_chain),
            ("from_specific", &self.from_specific),
            ("to_chain", &self.to_chain),
            ("to_specific", &self.to_specific),
            ("side", &self.side),
            ("reason", &self.reason),
        ]
        .into_iter()
        .find(|(_, aliases)| aliases.iter().all(|a| a.trim().is_empty()))
        .map(|(name, _)| name)
    }

    /// Build the outgoing payload. Amount is sent as a decimal string;
    /// empty sub-network fields are left out.
    pub fn build(&self, request: &VenueTradeRequest) -> Map<String, Value> {
        let mut payload = Map::new();
        let mut put = |aliases: &[String], value: &str| {
            for alias in aliases.iter().filter(|a| !a.trim().is_empty()) {
                payload.insert(alias.clone(), Value::String(value.to_string()));
            }
        };

        put(&self.from_token, &request.from_token);
        put(&self.to_token, &request.to_token);
        put(&self.amount, &request.amount.to_string());
        put(&self.from_chain, &request.from_chain);
        if !request.from_specific.is_empty() {
            put(&self.from_specific, &request.from_specific);
        }
        put(&self.to_chain, &request.to_chain);
        if !request.to_specific.is_empty() {
            put(&self.to_specific, &request.to_specific);
        }
        put(&self.side, request.side.as_str());
        put(&self.reason, &request.reason);
        payload
    }
}
