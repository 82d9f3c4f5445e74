//! Dedup store gateway
//!
//! Maps URLs to content keys and fronts the shared store for the workers.
//! Checking `exists` before probing gives at-most-once classification per URL
//! within a run. Two workers racing on the same URL may both see a miss and
//! both write; the verdict is a pure function of the probes, so the last
//! write is equivalent to the first.

use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::StoredRecord;
use sha2::{Digest, Sha256};
use std::sync::{Arc, Mutex, MutexGuard};

/// Store handle shared between workers
pub type SharedStorage = Arc<Mutex<dyn Storage + Send>>;

/// Derives the record key for a URL: hex SHA-256 of the raw URL string
///
/// No normalization is applied, so `http://example.com` and
/// `http://example.com/` are different keys.
///
/// # Examples
///
/// ```
/// use safecrawl::storage::record_key;
///
/// assert_eq!(record_key("http://example.com"), record_key("http://example.com"));
/// assert_eq!(record_key("http://example.com").len(), 64);
/// ```
pub fn record_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

/// Existence checks and writes against one collection
#[derive(Clone)]
pub struct DedupGateway {
    storage: SharedStorage,
    collection: String,
}

impl DedupGateway {
    pub fn new(storage: SharedStorage, collection: impl Into<String>) -> Self {
        Self {
            storage,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Returns true when a record for this URL is already stored
    pub fn exists(&self, url: &str) -> StorageResult<bool> {
        Ok(self.get(url)?.is_some())
    }

    /// Reads the record stored for a URL
    pub fn get(&self, url: &str) -> StorageResult<Option<StoredRecord>> {
        let key = record_key(url);
        self.lock()?.get_record(&self.collection, &key)
    }

    /// Writes the record for a URL, replacing any previous one
    pub fn put(&self, url: &str, record: &StoredRecord) -> StorageResult<()> {
        let key = record_key(url);
        self.lock()?.set_record(&self.collection, &key, record)
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, dyn Storage + Send + 'static>> {
        self.storage.lock().map_err(|_| StorageError::Lock)
    }
}
