//! Token Map File - Read-only `{symbol: venueIdentifier}` Document
//!
//! Re-read on every lookup. A missing file means "no mappings"; a
//! malformed one is logged and treated the same way.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use crate::domain::tokens::TokenMap;
use crate::ports::token_source::TokenMapSource;

/// Token mapping backed by a JSON file.
#[derive(Debug, Clone)]
pub struct TokenMapFile {
    path: PathBuf,
}

impl TokenMapFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TokenMapSource for TokenMapFile {
    async fn token_map(&self) -> TokenMap {
        let json = match fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No token map file, using identity mapping");
                return TokenMap::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read token map");
                return TokenMap::default();
            }
        };

        if json.trim().is_empty() {
            return TokenMap::default();
        }

        serde_json::from_str(&json).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Malformed token map, using identity mapping");
            TokenMap::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token_map.json");
        std::fs::write(&path, r#"{"ETH": "0xabc"}"#).unwrap();

        let map = TokenMapFile::new(&path).token_map().await;
        assert_eq!(map.resolve("ETH"), "0xabc");
        assert_eq!(map.resolve("BTC"), "BTC");
    }

    #[tokio::test]
    async fn test_missing_or_malformed_is_identity() {
        let dir = tempfile::tempdir().unwrap();
        let missing = TokenMapFile::new(dir.path().join("absent.json"));
        assert!(missing.token_map().await.is_empty());

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(TokenMapFile::new(&path).token_map().await.is_empty());
    }

    #[tokio::test]
    async fn test_picks_up_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token_map.json");
        let source = TokenMapFile::new(&path);
        std::fs::write(&path, r#"{"ETH": "0x1"}"#).unwrap();
        assert_eq!(source.token_map().await.resolve("ETH"), "0x1");
        std::fs::write(&path, r#"{"ETH": "0x2"}"#).unwrap();
        assert_eq!(source.token_map().await.resolve("ETH"), "0x2");
    }
}
