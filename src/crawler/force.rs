//! Force-include processing

use crate::safety::Classifier;
use crate::storage::{DedupGateway, RunCounts, StoredRecord};

/// Classifies and stores every configured force-include link, in order
///
/// No existence check is made: each link is re-probed and its record
/// overwritten on every run. Links are stored exactly as configured.
pub async fn process_force_includes(
    links: &[String],
    gateway: &DedupGateway,
    classifier: &Classifier,
) -> RunCounts {
    let mut counts = RunCounts::default();

    if links.is_empty() {
        tracing::info!("No links force included");
        return counts;
    }

    tracing::info!("Processing {} force include links", links.len());
    for link in links {
        let safety = classifier.classify(link).await;
        match gateway.put(link, &StoredRecord::force(link, safety)) {
            Ok(()) => counts.classified += 1,
            Err(e) => {
                tracing::warn!("Failed to store classification for {}: {}", link, e);
                counts.failed += 1;
            }
        }
    }

    counts
}
