/// Checks a base domain against the configured exclude list
///
/// An entry excludes the candidate when it occurs anywhere in the base domain
/// string, scheme included, so `"facebook.com"` rejects `https://m.facebook.com/`
/// and `"http://"` rejects every plain-HTTP candidate.
///
/// # Examples
///
/// ```
/// use safecrawl::url::is_excluded;
///
/// let excludes = vec!["facebook.com".to_string()];
/// assert!(is_excluded("https://www.facebook.com/", &excludes));
/// assert!(!is_excluded("https://example.com/", &excludes));
/// ```
pub fn is_excluded(base_domain: &str, excludes: &[String]) -> bool {
    excludes
        .iter()
        .any(|pattern| base_domain.contains(pattern.as_str()))
}
