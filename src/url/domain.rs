use url::Url;

/// Extracts the lowercase hostname from a URL, ignoring port and path
///
/// # Examples
///
/// ```
/// use url::Url;
/// use pagemeta::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM:8443/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if both URLs share the exact same hostname
///
/// Scheme, port, path and query are ignored, and subdomains do not match
/// their parent domain.
pub fn same_host(a: &Url, b: &Url) -> bool {
    match (extract_host(a), extract_host(b)) {
        (Some(a), Some(b)) => a == b,
        (None, None) => true,
        _ => false,
    }
}
