//! Repository Port - Ledger Persistence Interface
//!
//! Defines the store that owns the ledger document. A commit appends one
//! entry and applies its accounting effect inside a single critical
//! section, so concurrent requests cannot lose each other's updates.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ledger::Ledger;
use crate::domain::trade::LedgerEntry;

/// Ledger persistence failure.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("ledger I/O failed: {0}")]
  Io(#[from] std::io::Error),
  #[error("ledger serialization failed: {0}")]
  Serialize(#[from] serde_json::Error),
}

/// Trait for ledger storage providers.
#[async_trait]
pub trait LedgerStore: Send + Sync + 'static {
  /// Current ledger. Unreadable state degrades to an empty ledger.
  async fn load(&self) -> Ledger;

  /// Append `entry`, apply it to the portfolio and persist, atomically.
  ///
  /// Returns the ledger as committed.
  ///
  /// # Errors
  /// Returns `StoreError` if the updated ledger could not be written; the
  /// stored ledger is then unchanged.
  async fn commit(&self, entry: LedgerEntry) -> Result<Ledger, StoreError>;

  /// Check if the store is usable (permissions, disk).
  async fn is_healthy(&self) -> bool;
}
