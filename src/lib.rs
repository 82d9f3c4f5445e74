//! Safecrawl: a URL safety classifier fed by search results
//!
//! This crate discovers candidate sites for a list of search queries, decides
//! whether each one is safe to recommend (HTTP upgraded to HTTPS, valid
//! certificates), and persists one classification record per URL.

pub mod config;
pub mod crawler;
pub mod output;
pub mod safety;
pub mod search;
pub mod storage;
pub mod url;

#[cfg(test)]
pub(crate) mod testing;

use thiserror::Error;

/// Main error type for Safecrawl operations
#[derive(Debug, Error)]
pub enum SafecrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Worker for query '{query}' did not finish: {message}")]
    Worker { query: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Safecrawl operations
pub type Result<T> = std::result::Result<T, SafecrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use safety::{verdict_for, Classifier, HttpProber, ProbeOutcome, Prober, SafetyVerdict};
pub use crate::url::{base_domain, is_excluded, strip_to_hostname};
