//! Token Map Port - Read-only Ticker Mapping Source
//!
//! The mapping is re-read for every trade so edits to the mapping file
//! take effect without a restart.

use async_trait::async_trait;

use crate::domain::tokens::TokenMap;

/// Trait for token mapping providers.
#[async_trait]
pub trait TokenMapSource: Send + Sync + 'static {
  /// Current mapping. A missing or unreadable source yields an empty map.
  async fn token_map(&self) -> TokenMap;
}

/// A fixed in-memory mapping.
#[async_trait]
impl TokenMapSource for TokenMap {
  async fn token_map(&self) -> TokenMap {
    self.clone()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_fixed_map_is_its_own_source() {
    let map: TokenMap = [("ETH", "0xeth")].into_iter().collect();
    let served = tokio_test::block_on(map.token_map());
    assert_eq!(served, map);
    assert_eq!(served.resolve("ETH"), "0xeth");
  }
}
