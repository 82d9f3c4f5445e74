//! Integration tests for safecrawl
//!
//! Orchestrator tests drive the pipeline with scripted search results and
//! probe outcomes. Run tests go through `run_crawl` with a real prober,
//! a wiremock search endpoint and an on-disk database.

mod orchestrator_tests;
mod support;
