use crate::safety::probe::{ProbeOutcome, Prober};
use crate::safety::SafetyVerdict;
use crate::url::strip_to_hostname;
use std::sync::Arc;

/// Maps the plain-HTTP and HTTPS probe outcomes of one host to a verdict
///
/// # Decision Table
///
/// Rules are applied in order; the first match wins.
///
/// | # | Condition | Verdict |
/// |---|-----------|---------|
/// | 1 | both probes are `OtherFailure` | Dead |
/// | 2 | HTTP is not `OtherFailure`, HTTPS is `OtherFailure` | Unsafe |
/// | 3 | no `TlsFailure`, HTTP final URL starts with `https://`, HTTPS final URL starts with `https://` | Safe |
/// | 4 | anything else | Unsafe |
///
/// The table is deliberately asymmetric: an HTTP failure next to a working
/// HTTPS endpoint falls through to rule 4 (no upgraded HTTP final URL) and is
/// Unsafe, not Dead.
pub fn verdict_for(http: &ProbeOutcome, https: &ProbeOutcome) -> SafetyVerdict {
    if http.is_other_failure() && https.is_other_failure() {
        return SafetyVerdict::Dead;
    }

    if !http.is_other_failure() && https.is_other_failure() {
        return SafetyVerdict::Unsafe;
    }

    let lands_on_https = |outcome: &ProbeOutcome| {
        outcome
            .final_url()
            .is_some_and(|url| url.starts_with("https://"))
    };

    if !http.is_tls_failure()
        && !https.is_tls_failure()
        && lands_on_https(http)
        && lands_on_https(https)
    {
        SafetyVerdict::Safe
    } else {
        SafetyVerdict::Unsafe
    }
}

/// Probes a host over both schemes and applies [`verdict_for`]
///
/// Never fails: every network error has already been folded into a
/// [`ProbeOutcome`] by the prober.
#[derive(Clone)]
pub struct Classifier {
    prober: Arc<dyn Prober>,
}

impl Classifier {
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        Self { prober }
    }

    /// Classifies a hostname or raw URL
    ///
    /// Any leading `http://`/`https://` and surrounding slashes are stripped
    /// first, so search-provider strings can be passed straight through.
    pub async fn classify(&self, raw: &str) -> SafetyVerdict {
        let host = strip_to_hostname(raw);
        tracing::info!("Verifying URL: {}", host);

        let http_url = format!("http://{}", host);
        let https_url = format!("https://{}", host);

        let (http, https) = tokio::join!(
            self.prober.probe(&http_url),
            self.prober.probe(&https_url)
        );

        let verdict = verdict_for(&http, &https);
        match verdict {
            SafetyVerdict::Safe => tracing::info!("{}: SAFE to visit", host),
            SafetyVerdict::Unsafe => tracing::info!("{}: UNSAFE to visit", host),
            SafetyVerdict::Dead => tracing::info!("{}: DEAD URL", host),
        }

        verdict
    }
}
