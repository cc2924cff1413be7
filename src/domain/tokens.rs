//! Token resolver.
//!
//! Maps dashboard tickers to the identifiers the venue expects
//! (usually contract addresses). A symbol without a mapping resolves
//! to itself; a missing mapping is never an error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Static ticker → venue identifier table, `{"ETH": "0x..."}` on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenMap(HashMap<String, String>);

impl TokenMap {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self(entries)
    }

    /// Venue identifier for `symbol`, or `symbol` itself when unmapped.
    pub fn resolve<'a>(&'a self, symbol: &'a str) -> &'a str {
        self.0.get(symbol).map_or(symbol, String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TokenMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
