//! Error types for storage access, record ingestion and snapshots.

use thiserror::Error;

/// Errors reported by a [`WorldStore`](crate::store::WorldStore).
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Collection {collection} unavailable: {reason}")]
    Unavailable { collection: String, reason: String },

    #[error("Query failed: {0}")]
    Query(String),
}

/// A row that could not be turned into an entity record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("Row in {collection} has no id")]
    MissingId { collection: String },

    #[error("Row in {collection} has an id that is not a string or number")]
    InvalidId { collection: String },
}

/// Errors from snapshot save/load.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}
