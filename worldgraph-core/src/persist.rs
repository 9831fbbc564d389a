//! World snapshots for loading content into a [`MemoryStore`].
//!
//! A snapshot is a versioned JSON document holding raw rows per collection
//! plus the mention table, in the same shape the hosted backend returns.

use crate::error::SnapshotError;
use crate::record::{MentionRow, Row};
use crate::store::MemoryStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;

/// Current snapshot format version.
const SNAPSHOT_VERSION: u32 = 1;

/// Raw world content that can be written to and read from disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Format version for compatibility checking.
    pub version: u32,

    /// Rows keyed by collection name.
    #[serde(default)]
    pub collections: BTreeMap<String, Vec<Row>>,

    /// Directed mentions between entities.
    #[serde(default)]
    pub mentions: Vec<MentionRow>,
}

impl Default for WorldSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            collections: BTreeMap::new(),
            mentions: Vec::new(),
        }
    }

    /// Capture the current contents of a store.
    pub fn from_store(store: &MemoryStore) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            collections: store.collections().into_iter().collect(),
            mentions: store.mentions(),
        }
    }

    /// Load the snapshot into a fresh store.
    pub fn into_store(self) -> MemoryStore {
        let store = MemoryStore::new();
        for (collection, rows) in self.collections {
            for row in rows {
                store.insert_row(collection.clone(), row);
            }
        }
        for mention in self.mentions {
            store.insert_mention(mention);
        }
        store
    }

    /// Save to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Load from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let content = fs::read_to_string(path).await?;
        Self::from_json(&content)
    }

    /// Parse from a JSON string.
    pub fn from_json(content: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(content)?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::VersionMismatch {
                expected: SNAPSHOT_VERSION,
                found: snapshot.version,
            });
        }

        Ok(snapshot)
    }
}
