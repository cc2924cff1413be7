//! Ledger aggregate root.
//!
//! Holds the append-only entry sequence together with the portfolio
//! derived from it. The only mutation is [`Ledger::append`], which pushes
//! the entry and applies its accounting effect in one step, so the
//! portfolio is always the fold of the entries.

use serde::Serialize;

use super::portfolio::Portfolio;
use super::trade::LedgerEntry;

/// Entries in chronological (insertion) order plus the derived portfolio.
///
/// Serializes to the persisted document shape `{trades, portfolio}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ledger {
    trades: Vec<LedgerEntry>,
    portfolio: Portfolio,
}

impl Ledger {
    /// Empty ledger with an empty portfolio.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from its entries, recomputing the portfolio.
    pub fn from_entries(entries: Vec<LedgerEntry>) -> Self {
        let portfolio = Portfolio::fold(&entries);
        Self {
            trades: entries,
            portfolio,
        }
    }

    /// Append one entry and apply its accounting effect.
    pub fn append(&mut self, entry: LedgerEntry) -> &LedgerEntry {
        self.portfolio.apply(&entry);
        self.trades.push(entry);
        &self.trades[self.trades.len() - 1]
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.trades
    }

    pub const fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// Portfolio recomputed from the entry sequence.
    pub fn recompute_portfolio(&self) -> Portfolio {
        Portfolio::fold(&self.trades)
    }

    /// Whether `portfolio` is exactly what the entries fold to.
    pub fn matches(&self, portfolio: &Portfolio) -> bool {
        self.recompute_portfolio() == *portfolio
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn into_parts(self) -> (Vec<LedgerEntry>, Portfolio) {
        (self.trades, self.portfolio)
    }
}
