use serde::Deserialize;

/// Main configuration structure for Safecrawl
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    pub search: SearchConfig,
    #[serde(default)]
    pub keywords: KeywordsConfig,
}

/// Persistent store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Collection the classification records are written to
    #[serde(rename = "collection-name")]
    pub collection_name: String,
}

/// HTTP probe configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Log final URL, status and raw errors for every probe
    #[serde(default)]
    pub verbose: bool,

    /// Overrides the default user agent string
    #[serde(rename = "user-agent", default)]
    pub user_agent: Option<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            verbose: false,
            user_agent: None,
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

/// Search provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Enables the search-driven flow
    pub enabled: bool,

    /// Interface language passed to the provider (e.g. "en")
    #[serde(default = "default_language")]
    pub language: String,

    /// Top level domain of the search host (e.g. "com", "be")
    #[serde(rename = "top-level-domain", default = "default_tld")]
    pub top_level_domain: String,

    /// Optional country restriction (e.g. "countryBE")
    #[serde(default)]
    pub country: Option<String>,

    /// Maximum number of unique base domains gathered per query
    #[serde(rename = "number-of-results")]
    pub number_of_results: usize,

    /// Pause between result page requests (milliseconds)
    #[serde(rename = "pause-ms", default = "default_pause_ms")]
    pub pause_ms: u64,

    /// Base URL of the result pages; defaults to `https://www.google.<tld>`
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Separate TOML file holding the `[keywords]` table
    #[serde(rename = "keywords-path", default)]
    pub keywords_path: Option<String>,
}

impl SearchConfig {
    /// Returns the result page base URL, without trailing slash
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://www.google.{}", self.top_level_domain),
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_tld() -> String {
    "com".to_string()
}

fn default_pause_ms() -> u64 {
    2000
}

/// Query list, force-include list and exclusions
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeywordsConfig {
    /// URLs classified unconditionally before searching
    #[serde(rename = "force-include-links", default)]
    pub force_include_links: Vec<String>,

    /// Substrings that reject a candidate base domain
    #[serde(rename = "exclude-urls", default)]
    pub exclude_urls: Vec<String>,

    /// Search queries, one worker each
    #[serde(rename = "search-strings", default)]
    pub search_strings: Vec<String>,
}

/// Layout of a standalone keywords file
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct KeywordsFile {
    pub keywords: KeywordsConfig,
}
