//! Storage module for persisting classifications
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Content-addressed classification records
//! - The dedup gateway used by workers before and after classifying
//! - Run tracking

mod gateway;
mod schema;
mod sqlite;
mod traits;

pub use gateway::{record_key, DedupGateway, SharedStorage};
pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::safety::SafetyVerdict;
use crate::SafecrawlError;
use std::fmt;
use std::ops::AddAssign;
use std::path::Path;

/// Initializes or opens a storage database
pub fn open_storage(path: &Path) -> Result<SqliteStorage, SafecrawlError> {
    SqliteStorage::new(path)
}

/// How a URL reached the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordMethod {
    /// Discovered through a search query
    Search,
    /// Listed in `force-include-links`
    Force,
}

impl RecordMethod {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Force => "force",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "search" => Some(Self::Search),
            "force" => Some(Self::Force),
            _ => None,
        }
    }
}

impl fmt::Display for RecordMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// A persisted classification
///
/// `search_key` is present only for [`RecordMethod::Search`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub method: RecordMethod,
    pub search_key: Option<String>,
    pub url: String,
    pub safety: SafetyVerdict,
}

impl StoredRecord {
    /// Record for a URL found by a search query
    pub fn search(url: &str, query: &str, safety: SafetyVerdict) -> Self {
        Self {
            method: RecordMethod::Search,
            search_key: Some(query.to_string()),
            url: url.to_string(),
            safety,
        }
    }

    /// Record for a force-included URL
    pub fn force(url: &str, safety: SafetyVerdict) -> Self {
        Self {
            method: RecordMethod::Force,
            search_key: None,
            url: url.to_string(),
            safety,
        }
    }
}

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
    pub counts: RunCounts,
}

/// Per-run URL tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounts {
    /// URLs probed and written
    pub classified: u64,
    /// URLs skipped because a record already existed
    pub skipped: u64,
    /// URLs whose record could not be written
    pub failed: u64,
}

impl RunCounts {
    /// Total URLs that reached a worker
    pub fn total(&self) -> u64 {
        self.classified + self.skipped + self.failed
    }
}

impl AddAssign for RunCounts {
    fn add_assign(&mut self, other: Self) {
        self.classified += other.classified;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}
