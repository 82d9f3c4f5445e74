//! HTTP probe implementation
//!
//! A probe is a single GET request that follows redirects and is bounded by
//! the configured timeout. Every failure is folded into a [`ProbeOutcome`];
//! nothing is retried.

use crate::config::ProbeConfig;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::error::Error as StdError;
use std::time::Duration;
use url::Url;

/// Maximum redirect hops followed by a probe
const MAX_REDIRECTS: usize = 10;

/// Lowercase fragments that identify a TLS or certificate failure in an
/// error's source chain
const TLS_MARKERS: &[&str] = &[
    "certificate",
    "tls",
    "ssl",
    "handshake",
    "corrupt message",
];

/// Result of a single probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// A response was received (any status code)
    Success {
        /// URL after all redirects were followed
        final_url: String,
        /// Status code of the final response
        status_code: u16,
        /// Whether at least one redirect was followed
        redirected: bool,
    },

    /// Certificate or TLS handshake validation failed
    TlsFailure,

    /// Timeout, refused connection, DNS failure, malformed response, ...
    OtherFailure,
}

impl ProbeOutcome {
    pub fn is_other_failure(&self) -> bool {
        matches!(self, Self::OtherFailure)
    }

    pub fn is_tls_failure(&self) -> bool {
        matches!(self, Self::TlsFailure)
    }

    /// Final resolved URL, only present on success
    pub fn final_url(&self) -> Option<&str> {
        match self {
            Self::Success { final_url, .. } => Some(final_url),
            _ => None,
        }
    }
}

/// Issues probes against absolute URLs
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &str) -> ProbeOutcome;
}

/// Builds the HTTP client shared by all probes
///
/// Redirects are followed (up to 10 hops), certificates are validated against
/// the bundled webpki trust store, and both the connect phase and the whole
/// request are bounded by `timeout-secs`.
pub fn build_http_client(config: &ProbeConfig) -> Result<Client, reqwest::Error> {
    let user_agent = config
        .user_agent
        .clone()
        .unwrap_or_else(|| format!("safecrawl/{}", env!("CARGO_PKG_VERSION")));
    let timeout = Duration::from_secs(config.timeout_secs);

    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(timeout)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .use_rustls_tls()
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Prober`] backed by a reqwest client
pub struct HttpProber {
    client: Client,
    verbose: bool,
}

impl HttpProber {
    /// Creates a prober from the probe configuration
    ///
    /// `verbose` comes from the configuration and raises per-probe detail
    /// from debug to info level.
    pub fn new(config: &ProbeConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            verbose: config.verbose,
        })
    }

    fn report_success(&self, url: &str, final_url: &str, status_code: u16, redirected: bool) {
        if self.verbose {
            tracing::info!(
                "Probe {} -> {} (HTTP {}, redirected: {})",
                url,
                final_url,
                status_code,
                redirected
            );
        } else {
            tracing::debug!(
                "Probe {} -> {} (HTTP {}, redirected: {})",
                url,
                final_url,
                status_code,
                redirected
            );
        }
    }

    fn report_failure(&self, url: &str, outcome: &ProbeOutcome, error: &reqwest::Error) {
        if self.verbose {
            tracing::info!("Probe {} failed ({:?}): {}", url, outcome, error);
        } else {
            tracing::debug!("Probe {} failed ({:?}): {}", url, outcome, error);
        }
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        match self.client.get(url).send().await {
            Ok(response) => {
                let final_url = response.url().to_string();
                let status_code = response.status().as_u16();
                let redirected = was_redirected(url, response.url());

                self.report_success(url, &final_url, status_code, redirected);

                ProbeOutcome::Success {
                    final_url,
                    status_code,
                    redirected,
                }
            }
            Err(e) => {
                let outcome = categorize_error(&e);
                self.report_failure(url, &outcome, &e);
                outcome
            }
        }
    }
}

/// Compares the requested URL with where the client ended up
fn was_redirected(requested: &str, final_url: &Url) -> bool {
    match Url::parse(requested) {
        Ok(requested) => &requested != final_url,
        Err(_) => false,
    }
}

/// Splits request errors into TLS failures and everything else
fn categorize_error(error: &reqwest::Error) -> ProbeOutcome {
    if error.is_timeout() {
        return ProbeOutcome::OtherFailure;
    }

    // The top-level message embeds the URL, so only the causes are inspected
    if chain_mentions_tls(error.source()) {
        ProbeOutcome::TlsFailure
    } else {
        ProbeOutcome::OtherFailure
    }
}

/// Walks an error source chain looking for TLS or certificate failures
fn chain_mentions_tls(mut current: Option<&(dyn StdError + 'static)>) -> bool {
    while let Some(error) = current {
        let message = error.to_string().to_lowercase();
        if TLS_MARKERS.iter().any(|marker| message.contains(marker)) {
            return true;
        }
        current = error.source();
    }
    false
}
