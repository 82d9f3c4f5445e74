//! Orchestrator tests with scripted search results and probe outcomes

use crate::support::{create_test_config, keywords, landed_on, CountingSearch, ScriptedProber};
use rusqlite::{params, Connection};
use safecrawl::crawler::Orchestrator;
use safecrawl::storage::{record_key, DedupGateway, SharedStorage, SqliteStorage, StoredRecord};
use safecrawl::{Classifier, ProbeOutcome, SafetyVerdict};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn open_gateway(db_path: &Path) -> DedupGateway {
    let storage = SqliteStorage::new(db_path).expect("Failed to open DB");
    let storage: SharedStorage = Arc::new(Mutex::new(storage));
    DedupGateway::new(storage, "urls")
}

/// Reads the stored fields exactly as persisted
fn raw_record(db_path: &Path, url: &str) -> Option<(String, Option<String>, String, String)> {
    let conn = Connection::open(db_path).expect("Failed to open DB");
    conn.query_row(
        "SELECT method, search_key, url, safety FROM records WHERE collection = ?1 AND key = ?2",
        params!["urls", record_key(url)],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
    )
    .ok()
}

fn scenario_prober() -> ScriptedProber {
    ScriptedProber::default()
        .with("http://example.com", landed_on("https://example.com/", true))
        .with("https://example.com", landed_on("https://example.com/", false))
        .with(
            "http://insecure.example",
            landed_on("http://insecure.example/", false),
        )
        .with("https://insecure.example", ProbeOutcome::TlsFailure)
}

#[tokio::test]
async fn test_scenario_verdicts_persisted_as_text() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("safecrawl.db");

    let provider = Arc::new(CountingSearch::default().with(
        "test query",
        &[
            "http://example.com/about",
            "http://insecure.example/shop?item=1",
            "http://gone.example/",
        ],
    ));
    let config = create_test_config(
        db_path.to_str().unwrap(),
        10,
        keywords(&[], &[], &["test query"]),
    );
    let orchestrator = Orchestrator::new(
        &config,
        provider,
        Classifier::new(Arc::new(scenario_prober())),
        open_gateway(&db_path),
    );

    let summary = orchestrator.run().await;
    assert_eq!(summary.totals().classified, 3);

    assert_eq!(
        raw_record(&db_path, "http://example.com/"),
        Some((
            "search".to_string(),
            Some("test query".to_string()),
            "http://example.com/".to_string(),
            "True".to_string()
        ))
    );

    let (_, _, _, insecure) = raw_record(&db_path, "http://insecure.example/").unwrap();
    assert_eq!(insecure, "False");

    let (_, _, _, gone) = raw_record(&db_path, "http://gone.example/").unwrap();
    assert_eq!(gone, "None");
}

#[tokio::test]
async fn test_existing_records_are_not_probed_again() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("safecrawl.db");
    let gateway = open_gateway(&db_path);

    let known = StoredRecord::search("https://known.example/", "older query", SafetyVerdict::Safe);
    gateway
        .put("https://known.example/", &known)
        .expect("Failed to seed record");

    let provider = Arc::new(CountingSearch::default().with(
        "query",
        &["https://known.example/page", "https://new.example/"],
    ));
    let prober = Arc::new(ScriptedProber::default());
    let config = create_test_config(db_path.to_str().unwrap(), 10, keywords(&[], &[], &["query"]));
    let orchestrator = Orchestrator::new(
        &config,
        provider,
        Classifier::new(prober.clone()),
        gateway.clone(),
    );

    let summary = orchestrator.run().await;
    let totals = summary.totals();

    assert_eq!(totals.skipped, 1);
    assert_eq!(totals.classified, 1);
    assert!(prober.requested().iter().all(|url| !url.contains("known.example")));
    assert_eq!(gateway.get("https://known.example/").unwrap(), Some(known));
}

#[tokio::test]
async fn test_cap_limits_pulled_results() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("safecrawl.db");

    let provider = Arc::new(CountingSearch::default().with(
        "query",
        &[
            "https://one.example/a",
            "https://one.example/b",
            "https://two.example/",
            "https://three.example/",
            "https://four.example/",
            "https://five.example/",
        ],
    ));
    let prober = Arc::new(ScriptedProber::default());
    let config = create_test_config(db_path.to_str().unwrap(), 3, keywords(&[], &[], &["query"]));
    let orchestrator = Orchestrator::new(
        &config,
        provider.clone(),
        Classifier::new(prober.clone()),
        open_gateway(&db_path),
    );

    let summary = orchestrator.run().await;

    assert_eq!(summary.workers[0].counts.classified, 3);
    assert_eq!(provider.pulled(), 4);
    // Two probes per classified candidate
    assert_eq!(prober.requested().len(), 6);
    assert!(raw_record(&db_path, "https://four.example/").is_none());
}

#[tokio::test]
async fn test_excluded_domains_never_reach_a_worker() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("safecrawl.db");

    let provider = Arc::new(CountingSearch::default().with(
        "query",
        &[
            "https://www.facebook.com/page",
            "https://kept.example/",
            "https://en.wikipedia.org/wiki/Test",
        ],
    ));
    let prober = Arc::new(ScriptedProber::default());
    let config = create_test_config(
        db_path.to_str().unwrap(),
        10,
        keywords(&[], &["facebook", "wikipedia"], &["query"]),
    );
    let orchestrator = Orchestrator::new(
        &config,
        provider,
        Classifier::new(prober.clone()),
        open_gateway(&db_path),
    );

    let summary = orchestrator.run().await;

    assert_eq!(summary.totals().classified, 1);
    assert!(raw_record(&db_path, "https://kept.example/").is_some());
    assert!(raw_record(&db_path, "https://www.facebook.com/").is_none());
    assert!(prober
        .requested()
        .iter()
        .all(|url| !url.contains("facebook") && !url.contains("wikipedia")));
}

#[tokio::test]
async fn test_force_includes_processed_before_queries() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("safecrawl.db");

    let provider = Arc::new(CountingSearch::default().with("query", &["https://example.com/"]));
    let config = create_test_config(
        db_path.to_str().unwrap(),
        10,
        keywords(&["https://example.com/"], &[], &["query"]),
    );
    let prober = Arc::new(scenario_prober());
    let orchestrator = Orchestrator::new(
        &config,
        provider,
        Classifier::new(prober.clone()),
        open_gateway(&db_path),
    );

    let summary = orchestrator.run().await;

    // The force-included record makes the search hit a dedup skip
    assert_eq!(summary.force_include.classified, 1);
    assert_eq!(summary.workers[0].counts.skipped, 1);
    assert_eq!(prober.requested().len(), 2);

    let (method, search_key, _, safety) = raw_record(&db_path, "https://example.com/").unwrap();
    assert_eq!(method, "force");
    assert_eq!(search_key, None);
    assert_eq!(safety, "True");
}

#[tokio::test]
async fn test_many_queries_all_complete() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("safecrawl.db");

    let queries: Vec<String> = (0..8).map(|i| format!("query {}", i)).collect();
    let mut provider = CountingSearch::default();
    for (i, query) in queries.iter().enumerate() {
        let results = [format!("https://site{}.example/a", i), format!("https://site{}.example/b", i)];
        let refs: Vec<&str> = results.iter().map(|s| s.as_str()).collect();
        provider = provider.with(query, &refs);
    }

    let query_refs: Vec<&str> = queries.iter().map(|s| s.as_str()).collect();
    let config = create_test_config(db_path.to_str().unwrap(), 10, keywords(&[], &[], &query_refs));
    let orchestrator = Orchestrator::new(
        &config,
        Arc::new(provider),
        Classifier::new(Arc::new(ScriptedProber::default())),
        open_gateway(&db_path),
    );

    let summary = orchestrator.run().await;

    assert_eq!(summary.workers.len(), 8);
    assert!(summary.worker_failures.is_empty());
    for (i, report) in summary.workers.iter().enumerate() {
        assert_eq!(report.query, format!("query {}", i));
        assert_eq!(report.counts.classified, 1);
    }
    for i in 0..8 {
        let (_, search_key, _, safety) =
            raw_record(&db_path, &format!("https://site{}.example/", i)).unwrap();
        assert_eq!(search_key, Some(format!("query {}", i)));
        assert_eq!(safety, "None");
    }
}
