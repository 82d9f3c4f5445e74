use crate::config::types::{Config, KeywordsConfig, ProbeConfig, SearchConfig, StoreConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_store_config(&config.store)?;
    validate_probe_config(&config.probe)?;
    validate_search_config(&config.search)?;
    validate_keywords(&config.keywords)?;
    Ok(())
}

fn validate_store_config(config: &StoreConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if config.collection_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "collection_name cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_probe_config(config: &ProbeConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if let Some(user_agent) = &config.user_agent {
        if user_agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "user_agent cannot be blank when set".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    if config.number_of_results < 1 {
        return Err(ConfigError::Validation(format!(
            "number_of_results must be >= 1, got {}",
            config.number_of_results
        )));
    }

    if !config.enabled {
        return Ok(());
    }

    if config.language.trim().is_empty() {
        return Err(ConfigError::Validation(
            "language cannot be empty when search is enabled".to_string(),
        ));
    }

    if config.top_level_domain.trim().is_empty() && config.endpoint.is_none() {
        return Err(ConfigError::Validation(
            "top_level_domain cannot be empty when no endpoint is set".to_string(),
        ));
    }

    let endpoint = config.endpoint_url();
    let parsed = Url::parse(&endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid search endpoint '{}': {}", endpoint, e)))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Search endpoint '{}' must use http or https",
            endpoint
        )));
    }

    Ok(())
}

fn validate_keywords(keywords: &KeywordsConfig) -> Result<(), ConfigError> {
    // An empty substring would exclude every candidate
    if keywords.exclude_urls.iter().any(|e| e.is_empty()) {
        return Err(ConfigError::Validation(
            "exclude_urls cannot contain empty entries".to_string(),
        ));
    }

    if keywords
        .force_include_links
        .iter()
        .any(|link| link.trim().is_empty())
    {
        return Err(ConfigError::Validation(
            "force_include_links cannot contain empty entries".to_string(),
        ));
    }

    if keywords.search_strings.iter().any(|q| q.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "search_strings cannot contain empty queries".to_string(),
        ));
    }

    Ok(())
}
