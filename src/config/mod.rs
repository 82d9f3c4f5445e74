//! Configuration module for Safecrawl
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use safecrawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("safecrawl.toml")).unwrap();
//! println!("Result cap per query: {}", config.search.number_of_results);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, KeywordsConfig, ProbeConfig, SearchConfig, StoreConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
