//! URL handling module for pagemeta
//!
//! This module provides URL normalization, href resolution, hostname
//! extraction and internal/external link classification.

mod domain;
mod normalize;
mod resolve;

use ::url::Url;

// Re-export main functions
pub use domain::{extract_host, same_host};
pub use normalize::{canonical_url, normalize_url, url_key};
pub use resolve::{navigable_href, resolve_href};

/// Where a link points relative to the page it was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkScope {
    /// Same hostname as the page
    Internal,
    /// Any other hostname, subdomains included
    External,
}

/// Classifies a navigable href found on the page at `base`
///
/// Returns None if the href is skipped (empty, fragment-only, mailto/tel/
/// javascript) or cannot be resolved. Otherwise the href is resolved against
/// `base` and compared by hostname only.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use pagemeta::url::{classify_link, LinkScope};
///
/// let base = Url::parse("https://example.com/").unwrap();
/// assert_eq!(classify_link(&base, "/about"), Some(LinkScope::Internal));
/// assert_eq!(classify_link(&base, "https://sub.example.com/"), Some(LinkScope::External));
/// assert_eq!(classify_link(&base, "mailto:me@example.com"), None);
/// ```
pub fn classify_link(base: &Url, href: &str) -> Option<LinkScope> {
    let href = navigable_href(href)?;
    let target = resolve_href(base, href)?;

    if same_host(base, &target) {
        Some(LinkScope::Internal)
    } else {
        Some(LinkScope::External)
    }
}
