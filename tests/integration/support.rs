//! Shared helpers for the integration tests

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use safecrawl::config::{Config, KeywordsConfig, ProbeConfig, SearchConfig, StoreConfig};
use safecrawl::search::SearchProvider;
use safecrawl::{ProbeOutcome, Prober};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Creates a test configuration
pub fn create_test_config(db_path: &str, cap: usize, keywords: KeywordsConfig) -> Config {
    Config {
        store: StoreConfig {
            database_path: db_path.to_string(),
            collection_name: "urls".to_string(),
        },
        probe: ProbeConfig {
            timeout_secs: 2,
            verbose: true,
            user_agent: None,
        },
        search: SearchConfig {
            enabled: true,
            language: "en".to_string(),
            top_level_domain: "com".to_string(),
            country: None,
            number_of_results: cap,
            pause_ms: 0,
            endpoint: None,
            keywords_path: None,
        },
        keywords,
    }
}

pub fn keywords(force: &[&str], excludes: &[&str], queries: &[&str]) -> KeywordsConfig {
    let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
    KeywordsConfig {
        force_include_links: owned(force),
        exclude_urls: owned(excludes),
        search_strings: owned(queries),
    }
}

/// Prober answering from a fixed table; unknown URLs are unreachable
#[derive(Default)]
pub struct ScriptedProber {
    outcomes: HashMap<String, ProbeOutcome>,
    requested: Mutex<Vec<String>>,
}

impl ScriptedProber {
    pub fn with(mut self, url: &str, outcome: ProbeOutcome) -> Self {
        self.outcomes.insert(url.to_string(), outcome);
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        self.requested.lock().unwrap().push(url.to_string());
        self.outcomes
            .get(url)
            .cloned()
            .unwrap_or(ProbeOutcome::OtherFailure)
    }
}

pub fn landed_on(final_url: &str, redirected: bool) -> ProbeOutcome {
    ProbeOutcome::Success {
        final_url: final_url.to_string(),
        status_code: 200,
        redirected,
    }
}

/// Search provider with fixed results that counts how many were pulled
#[derive(Default)]
pub struct CountingSearch {
    results: HashMap<String, Vec<String>>,
    pulled: Arc<AtomicUsize>,
}

impl CountingSearch {
    pub fn with(mut self, query: &str, results: &[&str]) -> Self {
        self.results.insert(
            query.to_string(),
            results.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn pulled(&self) -> usize {
        self.pulled.load(Ordering::SeqCst)
    }
}

impl SearchProvider for CountingSearch {
    fn search(&self, query: &str) -> BoxStream<'static, String> {
        let results = self.results.get(query).cloned().unwrap_or_default();
        let pulled = Arc::clone(&self.pulled);
        stream::iter(results)
            .inspect(move |_| {
                pulled.fetch_add(1, Ordering::SeqCst);
            })
            .boxed()
    }
}
