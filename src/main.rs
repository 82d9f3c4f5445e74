//! Safecrawl main entry point
//!
//! This is the command-line interface for the Safecrawl URL safety classifier.

use anyhow::Context;
use clap::Parser;
use safecrawl::config::{load_config_with_hash, Config};
use safecrawl::crawler::run_crawl;
use safecrawl::output::{load_statistics, print_run_summary, print_statistics};
use safecrawl::storage::open_storage;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Safecrawl: find sites for search queries and check they are safe to recommend
///
/// A site is safe when plain HTTP is redirected to HTTPS and the HTTPS
/// endpoint presents a valid certificate. Every verdict is stored once per
/// URL in a SQLite database.
#[derive(Parser, Debug)]
#[command(name = "safecrawl")]
#[command(version = "1.0.0")]
#[command(about = "URL safety classifier fed by search results", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be classified without probing anything
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    with_timestamps(|line| println!("{}", line), run(cli)).await
}

/// Loads the config and dispatches to the selected mode
async fn run(cli: Cli) -> anyhow::Result<()> {
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e).with_context(|| format!("loading {}", cli.config.display()));
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config, &config_hash).await?;
    }

    Ok(())
}

/// Brackets `body` with start and finish lines, whatever its outcome
async fn with_timestamps<F>(mut emit: impl FnMut(String), body: F) -> anyhow::Result<()>
where
    F: Future<Output = anyhow::Result<()>>,
{
    emit(format!("Started at: {}", chrono::Local::now()));
    let result = body.await;
    emit(format!("Finished at: {}", chrono::Local::now()));
    result
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("safecrawl=info,warn"),
            1 => EnvFilter::new("safecrawl=debug,info"),
            2 => EnvFilter::new("safecrawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the validated configuration
fn handle_dry_run(config: &Config) {
    println!("=== Safecrawl Dry Run ===\n");

    println!("Store:");
    println!("  Database: {}", config.store.database_path);
    println!("  Collection: {}", config.store.collection_name);

    println!("\nProbe:");
    println!("  Timeout: {}s", config.probe.timeout_secs);
    println!("  Verbose: {}", config.probe.verbose);
    if let Some(user_agent) = &config.probe.user_agent {
        println!("  User agent: {}", user_agent);
    }

    println!("\nSearch:");
    println!("  Enabled: {}", config.search.enabled);
    println!("  Endpoint: {}", config.search.endpoint_url());
    println!("  Language: {}", config.search.language);
    if let Some(country) = &config.search.country {
        println!("  Country: {}", country);
    }
    println!("  Results per query: {}", config.search.number_of_results);
    println!("  Pause between pages: {}ms", config.search.pause_ms);

    let keywords = &config.keywords;
    println!(
        "\nForce Include Links ({}):",
        keywords.force_include_links.len()
    );
    for link in &keywords.force_include_links {
        println!("  - {}", link);
    }

    println!("\nExcluded URLs ({}):", keywords.exclude_urls.len());
    for exclude in &keywords.exclude_urls {
        println!("  - {}", exclude);
    }

    println!("\nSearch Strings ({}):", keywords.search_strings.len());
    for query in &keywords.search_strings {
        println!("  - {}", query);
    }

    println!("\n✓ Configuration is valid");
    if config.search.enabled {
        println!(
            "✓ Would classify {} forced links and up to {} search results",
            keywords.force_include_links.len(),
            search_result_ceiling(config)
        );
    } else {
        println!("✓ Search disabled, nothing would be classified");
    }
}

/// Upper bound on search candidates across all queries
fn search_result_ceiling(config: &Config) -> usize {
    config
        .keywords
        .search_strings
        .len()
        .saturating_mul(config.search.number_of_results)
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.store.database_path);

    let storage = open_storage(Path::new(&config.store.database_path))
        .context("opening database")?;
    let stats = load_statistics(&storage, &config.store.collection_name)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: &str) -> anyhow::Result<()> {
    tracing::info!(
        "Force include: {}, excludes: {}, queries: {}",
        config.keywords.force_include_links.len(),
        config.keywords.exclude_urls.len(),
        config.keywords.search_strings.len()
    );

    let summary = match run_crawl(config, config_hash).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    print_run_summary(&summary);

    Ok(())
}
