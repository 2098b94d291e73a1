//! Snapshot store trait abstraction.

use async_trait::async_trait;
use autotune_core::{SnapshotId, Time};
use autotune_tuner::TunerSnapshot;
use serde::{Deserialize, Serialize};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Summary of a stored snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    /// Snapshot identifier (sorts by creation time)
    pub id: SnapshotId,
    /// When it was stored
    pub saved_at: Time,
    /// Free-form label
    pub label: String,
    /// Engine generation at the time
    pub generation: u64,
}

/// A snapshot together with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSnapshot {
    /// Metadata
    #[serde(flatten)]
    pub meta: SnapshotMeta,
    /// Tuner state
    pub snapshot: TunerSnapshot,
}

/// Storage abstraction for tuner snapshots.
///
/// This trait allows different storage backends to be plugged in.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Store a snapshot and return its id.
    async fn save(&mut self, snapshot: &TunerSnapshot, label: &str) -> Result<SnapshotId>;

    /// Load a snapshot by id.
    async fn load(&self, id: SnapshotId) -> Result<Option<StoredSnapshot>>;

    /// Load the most recently stored snapshot.
    async fn load_latest(&self) -> Result<Option<StoredSnapshot>>;

    /// List stored snapshots, oldest first.
    async fn list(&self) -> Result<Vec<SnapshotMeta>>;

    /// Delete a snapshot.
    async fn delete(&mut self, id: SnapshotId) -> Result<()>;

    /// Keep only the `keep` newest snapshots; returns how many were removed.
    async fn prune(&mut self, keep: usize) -> Result<usize> {
        let all = self.list().await?;
        let excess = all.len().saturating_sub(keep);
        for meta in all.into_iter().take(excess) {
            self.delete(meta.id).await?;
        }
        Ok(excess)
    }
}
