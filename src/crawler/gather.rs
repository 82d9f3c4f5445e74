//! Candidate gathering for one query

use crate::url::{base_domain, is_excluded};
use futures::{Stream, StreamExt};

/// Pulls raw results until `cap` unique, non-excluded base domains are found
///
/// Each raw result is reduced to `scheme://host/`. Results that do not parse
/// as http(s) URLs are skipped. The stream is not polled again once the cap is
/// reached, so a lazy provider stops fetching pages at that point.
pub async fn gather_candidates<S>(mut results: S, excludes: &[String], cap: usize) -> Vec<String>
where
    S: Stream<Item = String> + Unpin,
{
    let mut candidates: Vec<String> = Vec::new();
    if cap == 0 {
        return candidates;
    }

    while let Some(raw) = results.next().await {
        let base = match base_domain(&raw) {
            Ok(base) => base,
            Err(e) => {
                tracing::debug!("Skipping search result {}: {}", raw, e);
                continue;
            }
        };

        if is_excluded(&base, excludes) {
            tracing::debug!("Excluded: {}", base);
            continue;
        }

        if candidates.contains(&base) {
            continue;
        }

        candidates.push(base);
        if candidates.len() == cap {
            break;
        }
    }

    candidates
}
