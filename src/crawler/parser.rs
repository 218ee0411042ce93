//! HTML document parsing
//!
//! Turns the buffered response body into markup text and a queryable DOM.
//! Parsing follows the standard HTML error-recovery rules, so missing or
//! unbalanced tags never fail a crawl. Only a body that is plainly not markup
//! is rejected.

use crate::PageMetaError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Number of leading bytes inspected for binary content
const BINARY_SNIFF_WINDOW: usize = 1024;

/// Decodes a response body into markup text
///
/// Invalid UTF-8 sequences are replaced rather than rejected. A NUL byte in
/// the first kilobyte marks the body as binary, which is a parse error.
pub fn decode_body(url: &Url, body: &[u8]) -> Result<String, PageMetaError> {
    let window = &body[..body.len().min(BINARY_SNIFF_WINDOW)];
    if window.contains(&0) {
        return Err(PageMetaError::HtmlParse {
            url: url.to_string(),
            message: "response body is binary, not markup".to_string(),
        });
    }

    Ok(String::from_utf8_lossy(body).into_owned())
}

/// Parses markup into a DOM tree
pub fn parse_html(markup: &str) -> Html {
    Html::parse_document(markup)
}

/// Counts elements matching a CSS selector
pub fn count_matches(document: &Html, css: &str) -> u32 {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).count() as u32,
        Err(_) => 0,
    }
}

/// Returns the page title, or an empty string if there is none
///
/// Only the first `<title>` element counts, so a stray `<title>` inside an
/// inline SVG or later in the body is ignored. Surrounding whitespace is
/// trimmed; inner whitespace is kept as written.
pub fn extract_title(document: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };

    document
        .select(&selector)
        .next()
        .map(|element| text_of(&element))
        .unwrap_or_default()
}

/// Returns the raw `href` of every `a[href]` element in document order
pub fn anchor_hrefs(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

fn text_of(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
