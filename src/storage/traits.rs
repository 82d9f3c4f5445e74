//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::safety::SafetyVerdict;
use crate::storage::{RecordMethod, RunCounts, RunRecord, RunStatus, StoredRecord};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Corrupt record {key}: {message}")]
    CorruptRecord { key: String, message: String },

    #[error("Storage lock poisoned")]
    Lock,

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Records live in named collections and are addressed by a content key
/// derived from the URL (see [`crate::storage::record_key`]). A single
/// `set_record` call must be atomic; callers do no further locking per key.
pub trait Storage {
    // ===== Classification Records =====

    /// Gets a record, `None` when the key is not present
    fn get_record(&self, collection: &str, key: &str) -> StorageResult<Option<StoredRecord>>;

    /// Writes a record, replacing every field of an existing one
    fn set_record(
        &mut self,
        collection: &str,
        key: &str,
        record: &StoredRecord,
    ) -> StorageResult<()>;

    /// Counts all records in a collection
    fn count_records(&self, collection: &str) -> StorageResult<u64>;

    /// Counts records per safety verdict
    fn count_by_safety(&self, collection: &str) -> StorageResult<HashMap<SafetyVerdict, u64>>;

    /// Counts records per discovery method
    fn count_by_method(&self, collection: &str) -> StorageResult<HashMap<RecordMethod, u64>>;

    // ===== Run Management =====

    /// Creates a new run in the `running` state
    ///
    /// # Arguments
    ///
    /// * `config_hash` - Hash of the configuration file
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Marks a run finished with its final status and URL counts
    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        counts: &RunCounts,
    ) -> StorageResult<()>;
}
