//! Result-page search provider
//!
//! Pages through `<endpoint>/search?q=..&hl=..&num=..&start=..` and scrapes
//! result links out of the returned HTML. Both redirect-style links
//! (`/url?q=<target>`) and direct absolute links are recognised; links back to
//! the search host itself are dropped.

use crate::config::{ProbeConfig, SearchConfig};
use crate::search::SearchProvider;
use futures::stream::{self, BoxStream, StreamExt};
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use url::Url;

/// Hard stop on pagination for a single query
const MAX_RESULT_PAGES: usize = 30;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; safecrawl/1.0)";

/// Search provider backed by a Google-style HTML result page
#[derive(Clone)]
pub struct GoogleSearch {
    client: Client,
    endpoint: String,
    language: String,
    country: Option<String>,
    page_size: usize,
    pause: Duration,
}

impl GoogleSearch {
    /// Creates a provider from the search configuration
    ///
    /// The probe configuration supplies the request timeout and user agent.
    pub fn new(search: &SearchConfig, probe: &ProbeConfig) -> Result<Self, reqwest::Error> {
        let user_agent = probe
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(probe.timeout_secs))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            endpoint: search.endpoint_url(),
            language: search.language.clone(),
            country: search.country.clone(),
            page_size: search.number_of_results.clamp(10, 100),
            pause: Duration::from_millis(search.pause_ms),
        })
    }

    fn page_url(&self, query: &str, start: usize) -> Result<Url, url::ParseError> {
        let mut params = vec![
            ("q", query.to_string()),
            ("hl", self.language.clone()),
            ("num", self.page_size.to_string()),
            ("start", start.to_string()),
        ];
        if let Some(country) = &self.country {
            params.push(("cr", country.clone()));
        }
        Url::parse_with_params(&format!("{}/search", self.endpoint), &params)
    }

    /// Fetches one result page; `None` ends the sequence
    async fn fetch_page(&self, query: &str, start: usize) -> Option<Vec<String>> {
        let url = match self.page_url(query, start) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Cannot build search URL for '{}': {}", query, e);
                return None;
            }
        };
        let search_host = url.host_str().map(|h| h.to_string());

        tracing::debug!("Fetching search results: {}", url);
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Search request for '{}' failed: {}", query, e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                "Search for '{}' returned HTTP {}, stopping",
                query,
                response.status().as_u16()
            );
            return None;
        }

        match response.text().await {
            Ok(body) => Some(extract_result_links(&body, search_host.as_deref())),
            Err(e) => {
                tracing::warn!("Failed to read search results for '{}': {}", query, e);
                None
            }
        }
    }
}

/// Pagination state carried between stream polls
struct ResultPages {
    search: GoogleSearch,
    query: String,
    page: usize,
    pending: VecDeque<String>,
    seen: HashSet<String>,
    exhausted: bool,
}

impl ResultPages {
    async fn load_next_page(&mut self) {
        if self.page >= MAX_RESULT_PAGES {
            self.exhausted = true;
            return;
        }

        if self.page > 0 {
            tokio::time::sleep(self.search.pause).await;
        }

        let start = self.page * self.search.page_size;
        self.page += 1;

        let Some(links) = self.search.fetch_page(&self.query, start).await else {
            self.exhausted = true;
            return;
        };

        let before = self.pending.len();
        for link in links {
            if self.seen.insert(link.clone()) {
                self.pending.push_back(link);
            }
        }

        // A page with nothing new means the provider ran out of results
        if self.pending.len() == before {
            self.exhausted = true;
        }
    }
}

impl SearchProvider for GoogleSearch {
    fn search(&self, query: &str) -> BoxStream<'static, String> {
        let pages = ResultPages {
            search: self.clone(),
            query: query.to_string(),
            page: 0,
            pending: VecDeque::new(),
            seen: HashSet::new(),
            exhausted: false,
        };

        stream::unfold(pages, |mut pages| async move {
            loop {
                if let Some(link) = pages.pending.pop_front() {
                    return Some((link, pages));
                }
                if pages.exhausted {
                    return None;
                }
                pages.load_next_page().await;
            }
        })
        .boxed()
    }
}

/// Extracts result URLs from a result page, in document order
fn extract_result_links(html: &str, search_host: Option<&str>) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| resolve_result_href(href, search_host))
        .collect()
}

fn resolve_result_href(href: &str, search_host: Option<&str>) -> Option<String> {
    if let Some(query) = href.strip_prefix("/url?") {
        return url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "q" || key == "url")
            .map(|(_, target)| target.into_owned())
            .filter(|target| target.starts_with("http://") || target.starts_with("https://"));
    }

    let url = Url::parse(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    let host = url.host_str()?;
    if Some(host) == search_host || host.contains("google.") {
        return None;
    }

    Some(href.to_string())
}
