use url::Url;

/// Schemes whose links never count as page-to-page navigation
const NON_NAVIGABLE_SCHEMES: &[&str] = &["mailto:", "tel:", "javascript:"];

/// Returns the trimmed href if it is a navigable link
///
/// Excluded:
/// - empty or whitespace-only hrefs
/// - fragment-only hrefs (`#section`)
/// - `mailto:`, `tel:` and `javascript:` links (scheme is matched case-insensitively)
pub fn navigable_href(href: &str) -> Option<&str> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if NON_NAVIGABLE_SCHEMES
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    Some(href)
}

/// Resolves an href against the page's base URL
///
/// Relative references inherit the base's scheme, host and path. Returns
/// None when the href cannot be resolved.
pub fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    base.join(href.trim()).ok()
}
