//! Console reports
//!
//! This module handles:
//! - Collection statistics for `--stats`
//! - The end-of-run summary printed after a crawl

pub mod stats;

pub use stats::{load_statistics, print_statistics, CollectionStatistics};

use crate::crawler::RunSummary;

/// Prints the per-query breakdown of a finished run
pub fn print_run_summary(summary: &RunSummary) {
    println!("=== Run Summary ===\n");

    let force = summary.force_include;
    println!(
        "Force include: {} classified, {} failed",
        force.classified, force.failed
    );

    if !summary.workers.is_empty() {
        println!("\nQueries ({}):", summary.workers.len());
        for report in &summary.workers {
            println!(
                "  - {}: {} classified, {} skipped, {} failed",
                report.query, report.counts.classified, report.counts.skipped, report.counts.failed
            );
        }
    }

    if !summary.worker_failures.is_empty() {
        println!("\nWorker failures ({}):", summary.worker_failures.len());
        for failure in &summary.worker_failures {
            println!("  - {}", failure);
        }
    }

    let totals = summary.totals();
    println!(
        "\nTotal: {} classified, {} skipped, {} failed",
        totals.classified, totals.skipped, totals.failed
    );
}
