/// Reduces a raw URL or search-provider string to a bare hostname for probing
///
/// A leading `http://` or `https://` (any case) is removed, then any leading
/// and trailing slashes. Paths after the host are left in place.
///
/// # Examples
///
/// ```
/// use safecrawl::url::strip_to_hostname;
///
/// assert_eq!(strip_to_hostname("https://example.com/"), "example.com");
/// assert_eq!(strip_to_hostname("http://example.com"), "example.com");
/// assert_eq!(strip_to_hostname("example.com"), "example.com");
/// ```
pub fn strip_to_hostname(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_scheme = strip_prefix_ignore_case(trimmed, "https://")
        .or_else(|| strip_prefix_ignore_case(trimmed, "http://"))
        .unwrap_or(trimmed);

    without_scheme.trim_matches('/').to_string()
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}
