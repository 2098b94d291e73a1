//! Snapshot storage for autotune.
//!
//! The tuner itself never performs I/O; this crate is the external store a
//! caller uses to retain [`TunerSnapshot`](autotune_tuner::TunerSnapshot)s
//! between runs, with a JSON-file reference implementation.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;

pub use trait_::{SnapshotStore, StorageError, Result, StoredSnapshot, SnapshotMeta};
pub use json_storage::JsonSnapshotStore;
