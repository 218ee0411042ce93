use crate::UrlError;
use url::{Position, Url};

/// Scheme assumed when the input carries none
const DEFAULT_SCHEME: &str = "https";

/// Normalizes a URL into the canonical key used for de-duplication
///
/// # Normalization Steps
///
/// 1. Default to `https://` when no scheme is present
/// 2. Parse the URL; reject if malformed or not HTTP(S)
/// 3. Lowercase scheme and host
/// 4. Remove the `www.` prefix from the host
/// 5. Keep an explicit non-default port
/// 6. Remove the trailing slash from the path
///
/// Query and fragment are kept as-is. A bare root renders without a slash,
/// so `https://example.com/` becomes `https://example.com`.
///
/// # Examples
///
/// ```
/// use pagemeta::url::normalize_url;
///
/// let url = normalize_url("HTTP://WWW.Example.com/x/").unwrap();
/// assert_eq!(url, "http://example.com/x");
/// ```
pub fn normalize_url(raw: &str) -> Result<String, UrlError> {
    let url = canonical_url(raw)?;
    Ok(url_key(&url))
}

/// Parses and canonicalizes a URL, keeping it in `Url` form for fetching
pub fn canonical_url(raw: &str) -> Result<Url, UrlError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(UrlError::Parse("empty URL".to_string()));
    }

    let with_scheme = if has_scheme(raw) {
        raw.to_string()
    } else if let Some(rest) = raw.strip_prefix("//") {
        format!("{}://{}", DEFAULT_SCHEME, rest)
    } else {
        format!("{}://{}", DEFAULT_SCHEME, raw)
    };

    // The parser lowercases scheme and host for http(s)
    let mut url = Url::parse(&with_scheme).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    let host = url.host_str().ok_or(UrlError::MissingHost)?.to_lowercase();
    let stripped = strip_www(&host);
    if stripped != host {
        url.set_host(Some(stripped))
            .map_err(|e| UrlError::Malformed(format!("Failed to set host: {}", e)))?;
    }

    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/').to_string();
        url.set_path(&trimmed);
    }

    Ok(url)
}

/// True if `raw` starts with `scheme://`
///
/// A `://` after the first `/`, `?` or `#` belongs to the path, query or
/// fragment, not to the scheme.
fn has_scheme(raw: &str) -> bool {
    raw.find("://")
        .is_some_and(|i| i > 0 && !raw[..i].contains(['/', '?', '#']))
}

/// Strips leading `www.` labels, leaving at least one label behind
fn strip_www(host: &str) -> &str {
    let mut host = host;
    while let Some(rest) = host.strip_prefix("www.") {
        if rest.is_empty() {
            break;
        }
        host = rest;
    }
    host
}

/// Renders a canonical URL as its storage key, dropping the lone root slash
pub fn url_key(url: &Url) -> String {
    if url.path() == "/" {
        format!("{}{}", &url[..Position::BeforePath], &url[Position::AfterPath..])
    } else {
        url.to_string()
    }
}
