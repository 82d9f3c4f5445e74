//! Scripted collaborators shared by unit tests

use crate::safety::{ProbeOutcome, Prober};
use crate::search::SearchProvider;
use crate::storage::{DedupGateway, SharedStorage, SqliteStorage};
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Prober answering from a fixed table; unknown URLs are `OtherFailure`
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

    /// Host reachable on both schemes with HTTP upgraded to HTTPS
    pub fn with_safe_host(self, host: &str) -> Self {
        let landing = format!("https://{}/", host);
        self.with(&format!("http://{}", host), success(&landing, true))
            .with(&format!("https://{}", host), success(&landing, false))
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

pub fn success(final_url: &str, redirected: bool) -> ProbeOutcome {
    ProbeOutcome::Success {
        final_url: final_url.to_string(),
        status_code: 200,
        redirected,
    }
}

/// Provider returning a fixed result list per query
#[derive(Default)]
pub struct ScriptedSearch {
    results: HashMap<String, Vec<String>>,
}

impl ScriptedSearch {
    pub fn with(mut self, query: &str, results: &[&str]) -> Self {
        self.results.insert(
            query.to_string(),
            results.iter().map(|s| s.to_string()).collect(),
        );
        self
    }
}

impl SearchProvider for ScriptedSearch {
    fn search(&self, query: &str) -> BoxStream<'static, String> {
        let results = self.results.get(query).cloned().unwrap_or_default();
        stream::iter(results).boxed()
    }
}

pub fn memory_gateway() -> DedupGateway {
    let storage: SharedStorage = Arc::new(Mutex::new(SqliteStorage::open_in_memory().unwrap()));
    DedupGateway::new(storage, "urls")
}
