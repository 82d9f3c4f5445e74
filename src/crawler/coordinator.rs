//! Crawl orchestration
//!
//! A run only does work when search is enabled. It then has two phases:
//! - Force-include links are classified one by one.
//! - For each search query, candidates are gathered on the calling task and
//!   the batch is handed to a dedicated worker task. All workers are awaited
//!   before the run finishes.

use crate::config::Config;
use crate::crawler::force::process_force_includes;
use crate::crawler::gather::gather_candidates;
use crate::crawler::worker::{process_batch, WorkerReport};
use crate::safety::{Classifier, HttpProber};
use crate::search::{GoogleSearch, SearchProvider};
use crate::storage::{DedupGateway, RunCounts, RunStatus, SharedStorage, SqliteStorage, StorageError};
use crate::SafecrawlError;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// Aggregated outcome of a run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Force-include phase
    pub force_include: RunCounts,
    /// One report per query worker that ran to completion
    pub workers: Vec<WorkerReport>,
    /// Workers that panicked or were cancelled
    pub worker_failures: Vec<SafecrawlError>,
}

impl RunSummary {
    /// Sums force-include and worker counts
    pub fn totals(&self) -> RunCounts {
        let mut totals = self.force_include;
        for report in &self.workers {
            totals += report.counts;
        }
        totals
    }

    pub fn status(&self) -> RunStatus {
        if self.worker_failures.is_empty() {
            RunStatus::Completed
        } else {
            RunStatus::Failed
        }
    }
}

/// Drives force-include processing and the per-query workers
pub struct Orchestrator {
    force_include_links: Vec<String>,
    exclude_urls: Vec<String>,
    search_strings: Vec<String>,
    search_enabled: bool,
    cap: usize,
    provider: Arc<dyn SearchProvider>,
    classifier: Classifier,
    gateway: DedupGateway,
}

impl Orchestrator {
    pub fn new(
        config: &Config,
        provider: Arc<dyn SearchProvider>,
        classifier: Classifier,
        gateway: DedupGateway,
    ) -> Self {
        Self {
            force_include_links: config.keywords.force_include_links.clone(),
            exclude_urls: config.keywords.exclude_urls.clone(),
            search_strings: config.keywords.search_strings.clone(),
            search_enabled: config.search.enabled,
            cap: config.search.number_of_results,
            provider,
            classifier,
            gateway,
        }
    }

    /// Runs both phases to completion
    ///
    /// With search disabled nothing is classified, force-include links
    /// included.
    pub async fn run(&self) -> RunSummary {
        let mut summary = RunSummary::default();

        if !self.search_enabled {
            tracing::info!("Search disabled, nothing to classify");
            return summary;
        }

        summary.force_include =
            process_force_includes(&self.force_include_links, &self.gateway, &self.classifier)
                .await;

        if self.search_strings.is_empty() {
            tracing::info!("No search strings provided");
            return summary;
        }

        tracing::info!("Searching for {} queries", self.search_strings.len());
        let mut workers: Vec<(String, JoinHandle<WorkerReport>)> = Vec::new();

        for query in &self.search_strings {
            tracing::info!("Starting to search for: {}", query);
            let candidates =
                gather_candidates(self.provider.search(query), &self.exclude_urls, self.cap).await;
            tracing::info!("Gathered {} candidates for '{}'", candidates.len(), query);

            workers.push((query.clone(), self.spawn_worker(query.clone(), candidates)));
        }

        let (queries, handles): (Vec<String>, Vec<JoinHandle<WorkerReport>>) =
            workers.into_iter().unzip();
        let results = futures::future::join_all(handles).await;

        for (query, result) in queries.into_iter().zip(results) {
            match result {
                Ok(report) => summary.workers.push(report),
                Err(e) => {
                    let failure = SafecrawlError::Worker {
                        query,
                        message: e.to_string(),
                    };
                    tracing::error!("{}", failure);
                    summary.worker_failures.push(failure);
                }
            }
        }

        summary
    }

    fn spawn_worker(&self, query: String, candidates: Vec<String>) -> JoinHandle<WorkerReport> {
        let gateway = self.gateway.clone();
        let classifier = self.classifier.clone();

        tokio::spawn(async move { process_batch(&query, &candidates, &gateway, &classifier).await })
    }
}

/// Runs a complete crawl against the configured store
///
/// Opens the database, records a run, classifies everything and marks the
/// run finished with its totals. Only store setup failures are returned;
/// per-URL problems end up in the summary counts.
///
/// # Example
///
/// ```no_run
/// use safecrawl::config::load_config_with_hash;
/// use safecrawl::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("safecrawl.toml"))?;
/// let summary = run_crawl(config, &hash).await?;
/// println!("{} URLs classified", summary.totals().classified);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, config_hash: &str) -> Result<RunSummary, SafecrawlError> {
    let storage = SqliteStorage::new(Path::new(&config.store.database_path))?;
    let storage: SharedStorage = Arc::new(Mutex::new(storage));

    // No run row is written when a client cannot be built
    let prober = Arc::new(HttpProber::new(&config.probe)?);
    let provider = Arc::new(GoogleSearch::new(&config.search, &config.probe)?);

    let run_id = storage
        .lock()
        .map_err(|_| StorageError::Lock)?
        .create_run(config_hash)?;
    tracing::info!("Started run {}", run_id);

    let gateway = DedupGateway::new(storage.clone(), config.store.collection_name.clone());

    let orchestrator = Orchestrator::new(&config, provider, Classifier::new(prober), gateway);
    let summary = orchestrator.run().await;

    let totals = summary.totals();
    storage
        .lock()
        .map_err(|_| StorageError::Lock)?
        .finish_run(run_id, summary.status(), &totals)?;

    tracing::info!(
        "Run {} finished: {} classified, {} skipped, {} failed",
        run_id,
        totals.classified,
        totals.skipped,
        totals.failed
    );

    Ok(summary)
}
