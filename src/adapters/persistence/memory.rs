//! In-memory ledger store for tests and throwaway sessions.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ledger::Ledger;
use crate::domain::trade::LedgerEntry;
use crate::ports::repository::{LedgerStore, StoreError};

/// Ledger held in process memory only.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    ledger: Mutex<Ledger>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing ledger.
    pub fn with_ledger(ledger: Ledger) -> Self {
        Self {
            ledger: Mutex::new(ledger),
        }
    }
}

#[async_trait]
impl LedgerStore for InMemoryStore {
    async fn load(&self) -> Ledger {
        self.ledger.lock().await.clone()
    }

    async fn commit(&self, entry: LedgerEntry) -> Result<Ledger, StoreError> {
        let mut ledger = self.ledger.lock().await;
        ledger.append(entry);
        Ok(ledger.clone())
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}
