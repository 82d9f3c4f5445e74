//! Statistics from the classification database
//!
//! This module provides functionality for extracting and displaying
//! collection statistics from the storage layer.

use crate::safety::SafetyVerdict;
use crate::storage::{RecordMethod, RunRecord, Storage};
use crate::SafecrawlError;
use std::collections::HashMap;

/// Collection statistics summary
#[derive(Debug, Clone)]
pub struct CollectionStatistics {
    pub collection: String,

    /// Total number of stored records
    pub total_records: u64,

    /// Count of records by verdict
    pub by_safety: HashMap<SafetyVerdict, u64>,

    /// Count of records by discovery method
    pub by_method: HashMap<RecordMethod, u64>,

    /// Most recent run, if any
    pub latest_run: Option<RunRecord>,
}

impl CollectionStatistics {
    pub fn safety_count(&self, verdict: SafetyVerdict) -> u64 {
        self.by_safety.get(&verdict).copied().unwrap_or(0)
    }

    pub fn method_count(&self, method: RecordMethod) -> u64 {
        self.by_method.get(&method).copied().unwrap_or(0)
    }
}

/// Loads statistics for one collection
///
/// # Arguments
///
/// * `storage` - The storage backend to query
/// * `collection` - Collection name from the configuration
///
/// # Returns
///
/// * `Ok(CollectionStatistics)` - Successfully loaded statistics
/// * `Err(SafecrawlError)` - Failed to query statistics
pub fn load_statistics(
    storage: &dyn Storage,
    collection: &str,
) -> Result<CollectionStatistics, SafecrawlError> {
    Ok(CollectionStatistics {
        collection: collection.to_string(),
        total_records: storage.count_records(collection)?,
        by_safety: storage.count_by_safety(collection)?,
        by_method: storage.count_by_method(collection)?,
        latest_run: storage.get_latest_run()?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CollectionStatistics) {
    println!("=== Safecrawl Statistics ===\n");

    println!("Collection: {}", stats.collection);
    println!("  Total records: {}", stats.total_records);
    println!();

    println!("Records by Verdict:");
    for verdict in [SafetyVerdict::Safe, SafetyVerdict::Unsafe, SafetyVerdict::Dead] {
        let count = stats.safety_count(verdict);
        println!("  {}: {} ({:.1}%)", verdict, count, percentage(count, stats.total_records));
    }
    println!();

    println!("Records by Method:");
    for method in [RecordMethod::Search, RecordMethod::Force] {
        println!("  {}: {}", method, stats.method_count(method));
    }
    println!();

    match &stats.latest_run {
        Some(run) => {
            println!("Latest Run (#{}):", run.id);
            println!("  Status: {}", run.status.to_db_string());
            println!("  Started: {}", run.started_at);
            println!(
                "  Finished: {}",
                run.finished_at.as_deref().unwrap_or("(not finished)")
            );
            println!("  Config hash: {}", run.config_hash);
            println!(
                "  Classified: {}, skipped: {}, failed: {}",
                run.counts.classified, run.counts.skipped, run.counts.failed
            );
        }
        None => println!("No runs recorded yet"),
    }
}

fn percentage(count: u64, total: u64) -> f64 {
    if total > 0 {
        (count as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}
