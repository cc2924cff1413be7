//! Portfolio accountant.
//!
//! Folds trades into per-token balances. The rule is the same for buys
//! and sells:
//!
//! ```text
//! balance[from_token] -= amount + fee
//! balance[to_token]   += amount
//! ```
//!
//! Bridge transfers carry no accounting effect.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::trade::{LedgerEntry, TokenSymbol, Trade};

/// Signed balance per token symbol. An absent symbol has balance zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Portfolio(BTreeMap<TokenSymbol, f64>);

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild balances from scratch by folding `entries` in order.
    pub fn fold<'a>(entries: impl IntoIterator<Item = &'a LedgerEntry>) -> Self {
        let mut portfolio = Self::new();
        for entry in entries {
            portfolio.apply(entry);
        }
        portfolio
    }

    /// Balance for `symbol`, zero when never touched.
    pub fn balance(&self, symbol: &str) -> f64 {
        self.0.get(symbol).copied().unwrap_or(0.0)
    }

    /// Apply one ledger entry's accounting effect.
    pub fn apply(&mut self, entry: &LedgerEntry) {
        match entry {
            LedgerEntry::Trade(trade) => self.apply_trade(trade),
            LedgerEntry::Bridge(_) => {}
        }
    }

    /// Apply a trade. Same-token trades are not special-cased: both
    /// updates land on one balance, netting to `-fee`.
    pub fn apply_trade(&mut self, trade: &Trade) {
        *self.0.entry(trade.from_token.clone()).or_insert(0.0) -= trade.amount + trade.fee;
        *self.0.entry(trade.to_token.clone()).or_insert(0.0) += trade.amount;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TokenSymbol, &f64)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
