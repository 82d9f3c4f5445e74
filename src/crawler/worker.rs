//! Per-query worker

use crate::safety::Classifier;
use crate::storage::{DedupGateway, RunCounts, StoredRecord};

/// Outcome of one query's worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    pub query: String,
    pub counts: RunCounts,
}

/// Classifies and stores a query's batch, one URL at a time
///
/// URLs already present in the store are skipped without probing. A failed
/// store write is logged and counted; the worker carries on with the rest of
/// the batch.
pub async fn process_batch(
    query: &str,
    urls: &[String],
    gateway: &DedupGateway,
    classifier: &Classifier,
) -> WorkerReport {
    let mut counts = RunCounts::default();

    for url in urls {
        match gateway.exists(url) {
            Ok(true) => {
                tracing::debug!("Already classified, skipping: {}", url);
                counts.skipped += 1;
                continue;
            }
            Ok(false) => {}
            Err(e) => {
                // Treated as a miss
                tracing::warn!("Lookup failed for {}, classifying anyway: {}", url, e);
            }
        }

        let safety = classifier.classify(url).await;
        let record = StoredRecord::search(url, query, safety);

        match gateway.put(url, &record) {
            Ok(()) => counts.classified += 1,
            Err(e) => {
                tracing::warn!("Failed to store classification for {}: {}", url, e);
                counts.failed += 1;
            }
        }
    }

    tracing::info!(
        "Finished query '{}': {} classified, {} skipped, {} failed",
        query,
        counts.classified,
        counts.skipped,
        counts.failed
    );

    WorkerReport {
        query: query.to_string(),
        counts,
    }
}
