use crate::config::types::{Config, KeywordsFile};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// When `search.keywords-path` is set, the `[keywords]` table is read from that
/// file instead (relative paths resolve against the config file's directory).
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use safecrawl::config::load_config;
///
/// let config = load_config(Path::new("safecrawl.toml")).unwrap();
/// println!("Queries: {}", config.keywords.search_strings.len());
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut config: Config = toml::from_str(&content)?;

    if let Some(keywords_path) = &config.search.keywords_path {
        let keywords_path = match path.parent() {
            Some(dir) => dir.join(keywords_path),
            None => Path::new(keywords_path).to_path_buf(),
        };
        let keywords_content = std::fs::read_to_string(&keywords_path)?;
        let file: KeywordsFile = toml::from_str(&keywords_content)?;
        config.keywords = file.keywords;
    }

    validate(&config)?;

    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Stored with every run so a run can be traced back to the config it used.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
