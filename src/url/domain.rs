use crate::{UrlError, UrlResult};
use url::Url;

/// Reduces a raw URL to its base domain: `scheme://host[:port]/`
///
/// Path, query, fragment and credentials are discarded, the host is
/// lowercased and default ports are dropped. Only `http` and `https` URLs
/// produce a base domain.
///
/// # Examples
///
/// ```
/// use safecrawl::url::base_domain;
///
/// let base = base_domain("https://WWW.Example.com/some/page?q=1#top").unwrap();
/// assert_eq!(base, "https://www.example.com/");
///
/// let base = base_domain("http://example.com:8080/path").unwrap();
/// assert_eq!(base, "http://example.com:8080/");
/// ```
pub fn base_domain(raw: &str) -> UrlResult<String> {
    let url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    let host = url.host_str().ok_or(UrlError::MissingHost)?;

    let mut base = format!("{}://{}", url.scheme(), host);
    if let Some(port) = url.port() {
        base.push_str(&format!(":{}", port));
    }
    base.push('/');

    Ok(base)
}
