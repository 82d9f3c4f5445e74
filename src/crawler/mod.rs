//! Crawl pipeline: from search queries to stored classifications
//!
//! This module contains:
//! - Candidate gathering from a lazy search result stream
//! - The per-query worker that drives dedup checks and classification
//! - Force-include processing
//! - Overall run orchestration

mod coordinator;
mod force;
mod gather;
mod worker;

pub use coordinator::{run_crawl, Orchestrator, RunSummary};
pub use force::process_force_includes;
pub use gather::gather_candidates;
pub use worker::{process_batch, WorkerReport};
