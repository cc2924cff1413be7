//! JSON Ledger Store - Single-document Ledger Persistence
//!
//! Keeps the whole ledger in one JSON document `{trades, portfolio}`
//! and rewrites it with atomic writes (write to tmp file, then rename).
//! Every read-modify-write runs under one async mutex so concurrent
//! commits serialize instead of overwriting each other.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::ledger::Ledger;
use crate::domain::portfolio::Portfolio;
use crate::domain::request::TradeRequest;
use crate::domain::trade::{LedgerEntry, Trade, TradeStatus};
use crate::ports::repository::{LedgerStore, StoreError};

/// On-disk document shapes we accept.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredDocument {
    /// Current shape.
    Ledger {
        #[serde(default)]
        trades: Vec<LedgerEntry>,
        #[serde(default)]
        portfolio: Option<Portfolio>,
    },
    /// Earliest shape: a bare array of trade request bodies.
    Legacy(Vec<Value>),
}

/// Which on-disk shape a read decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentShape {
    Current,
    Legacy,
}

/// Timestamp given to legacy records that were stored without one.
const LEGACY_TIMESTAMP: &str = "1970-01-01T00:00:00.000Z";

/// Stable id for the legacy record at `index`.
fn legacy_entry_id(index: usize) -> String {
    format!("legacy-{index}")
}

/// A legacy record: the original request body plus a timestamp.
#[derive(Debug, Deserialize)]
struct LegacyRecord {
    #[serde(flatten)]
    request: TradeRequest,
    #[serde(default)]
    timestamp: Option<String>,
}

/// Ledger store backed by a single JSON file.
pub struct JsonFileStore {
    /// Path to the ledger document.
    path: PathBuf,
    /// Temporary path for atomic writes.
    tmp_path: PathBuf,
    /// Guards every read-modify-write of the document.
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open (or create) the ledger document at `path`.
    ///
    /// Creates the parent directory and an empty document if needed.
    ///
    /// # Errors
    /// Returns `StoreError::Io` if the directory or file can't be created.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).await?;
        }

        let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let store = Self {
            tmp_path: path.with_file_name(tmp_name),
            path,
            lock: Mutex::new(()),
        };

        if !store.path.exists() {
            store.write(&Ledger::new()).await?;
            info!(path = %store.path.display(), "Created empty ledger document");
        }

        Ok(store)
    }

    /// Location of the ledger document on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and decode the document. A missing or blank file is an empty
    /// ledger; anything undecodable is an error.
    async fn read(&self) -> Result<(Ledger, DocumentShape), StoreError> {
        if !self.path.exists() {
            return Ok((Ledger::new(), DocumentShape::Current));
        }

        let json = fs::read_to_string(&self.path).await?;
        if json.trim().is_empty() {
            return Ok((Ledger::new(), DocumentShape::Current));
        }

        let (ledger, shape) = match serde_json::from_str::<StoredDocument>(&json)? {
            StoredDocument::Ledger { trades, portfolio } => {
                let ledger = Ledger::from_entries(trades);
                if let Some(stored) = portfolio {
                    if !ledger.matches(&stored) {
                        warn!(
                            path = %self.path.display(),
                            "Stored portfolio diverges from ledger entries, using recomputed balances"
                        );
                    }
                }
                (ledger, DocumentShape::Current)
            }
            StoredDocument::Legacy(records) => {
                let total = records.len();
                let ledger = Self::upgrade_legacy(records);
                debug!(entries = ledger.len(), records = total, "Read legacy ledger document");
                (ledger, DocumentShape::Legacy)
            }
        };

        debug!(entries = ledger.len(), "Ledger document read");
        Ok((ledger, shape))
    }

    /// Convert legacy trade records. Each record keeps an id derived from
    /// its position, so repeated reads agree. Records that no longer
    /// validate are left out here and survive in the backup taken by
    /// [`Self::preserve_legacy`].
    fn upgrade_legacy(records: Vec<Value>) -> Ledger {
        let mut ledger = Ledger::new();
        for (index, record) in records.into_iter().enumerate() {
            let parsed = serde_json::from_value::<LegacyRecord>(record)
                .map_err(|e| e.to_string())
                .and_then(|r| {
                    r.request
                        .validate()
                        .map(|ticket| (ticket, r.timestamp))
                        .map_err(|e| e.to_string())
                });
            match parsed {
                Ok((ticket, timestamp)) => {
                    let timestamp = timestamp.unwrap_or_else(|| LEGACY_TIMESTAMP.to_string());
                    let trade = Trade::record_at(&ticket, TradeStatus::Filled, timestamp)
                        .with_id(legacy_entry_id(index));
                    ledger.append(LedgerEntry::Trade(trade));
                }
                Err(e) => warn!(index, error = %e, "Legacy trade record does not validate, keeping it in the backup only"),
            }
        }
        ledger
    }

    /// Copy a legacy document aside, untouched, before it is first
    /// rewritten in the current shape.
    async fn preserve_legacy(&self) -> Result<(), StoreError> {
        let target = self.sibling("legacy");
        fs::copy(&self.path, &target).await?;
        info!(
            path = %self.path.display(),
            backup = %target.display(),
            "Upgrading legacy ledger document, original records kept in backup"
        );
        Ok(())
    }

    /// `<file>.<tag>-<timestamp>` next to the ledger document.
    fn sibling(&self, tag: &str) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(format!(".{tag}-{}", chrono::Utc::now().format("%Y%m%dT%H%M%S%.3f")));
        self.path.with_file_name(name)
    }

    /// Serialize and atomically replace the document (tmp → rename).
    async fn write(&self, ledger: &Ledger) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(ledger)?;
        fs::write(&self.tmp_path, &json).await?;
        fs::rename(&self.tmp_path, &self.path).await?;
        Ok(())
    }

    /// Move an undecodable document aside so a fresh one can take its place.
    async fn quarantine(&self) -> Result<(), StoreError> {
        let target = self.sibling("corrupt");
        fs::rename(&self.path, &target).await?;
        error!(
            path = %self.path.display(),
            moved_to = %target.display(),
            "Ledger document unreadable, moved aside and starting a new ledger"
        );
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for JsonFileStore {
    #[instrument(skip(self))]
    async fn load(&self) -> Ledger {
        let _guard = self.lock.lock().await;
        match self.read().await {
            Ok((ledger, _)) => ledger,
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "Failed to read ledger, serving empty ledger");
                Ledger::new()
            }
        }
    }

    #[instrument(skip(self, entry), fields(entry_id = %entry.id(), kind = entry.kind()))]
    async fn commit(&self, entry: LedgerEntry) -> Result<Ledger, StoreError> {
        let _guard = self.lock.lock().await;

        let mut ledger = match self.read().await {
            Ok((ledger, DocumentShape::Current)) => ledger,
            Ok((ledger, DocumentShape::Legacy)) => {
                self.preserve_legacy().await?;
                ledger
            }
            Err(StoreError::Serialize(e)) => {
                warn!(error = %e, "Ledger document does not decode");
                self.quarantine().await?;
                Ledger::new()
            }
            Err(e) => return Err(e),
        };

        ledger.append(entry);
        self.write(&ledger).await?;

        info!(entries = ledger.len(), "Ledger entry committed");
        Ok(ledger)
    }

    async fn is_healthy(&self) -> bool {
        let marker = self.path.with_file_name(".health_check");
        let result = fs::write(&marker, b"ok").await;
        let _ = fs::remove_file(&marker).await;
        result.is_ok()
    }
}
