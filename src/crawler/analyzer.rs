//! Structural analysis of a parsed page
//!
//! Counts headings, classifies links as internal or external and detects
//! login forms. Everything here is synchronous and owns its output, so the
//! (non-`Send`) DOM never has to live across an await point.

use crate::crawler::parser::{anchor_hrefs, count_matches, extract_title, parse_html};
use crate::url::{classify_link, LinkScope};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Everything the analyzer derives from the DOM
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageAnalysis {
    pub title: String,
    pub h1_count: u32,
    pub h2_count: u32,
    pub h3_count: u32,
    pub internal_links: u32,
    pub external_links: u32,
    pub has_login_form: bool,
    /// Raw `href` values of every `a[href]` element, in document order
    pub anchors: Vec<String>,
}

/// Parses markup and analyzes it in one step
pub fn analyze_markup(markup: &str, base: &Url) -> PageAnalysis {
    let document = parse_html(markup);
    analyze(&document, base)
}

/// Analyzes a parsed document found at `base`
pub fn analyze(document: &Html, base: &Url) -> PageAnalysis {
    let anchors = anchor_hrefs(document);
    let (internal_links, external_links) = count_links(&anchors, base);

    PageAnalysis {
        title: extract_title(document),
        h1_count: count_matches(document, "h1"),
        h2_count: count_matches(document, "h2"),
        h3_count: count_matches(document, "h3"),
        internal_links,
        external_links,
        has_login_form: detect_login_form(document),
        anchors,
    }
}

/// Counts internal and external links among the given hrefs
///
/// Each navigable href lands in exactly one bucket; skipped hrefs land in
/// neither.
pub fn count_links(hrefs: &[String], base: &Url) -> (u32, u32) {
    hrefs
        .iter()
        .filter_map(|href| classify_link(base, href))
        .fold((0, 0), |(internal, external), scope| match scope {
            LinkScope::Internal => (internal + 1, external),
            LinkScope::External => (internal, external + 1),
        })
}

/// Returns true if any `<form>` contains an `<input type="password">`
///
/// Forms and their inputs are scanned in document order and the first
/// password input ends the whole scan.
pub fn detect_login_form(document: &Html) -> bool {
    let (Ok(form_selector), Ok(input_selector)) =
        (Selector::parse("form"), Selector::parse("input"))
    else {
        return false;
    };

    let forms = document
        .select(&form_selector)
        .map(|form| form.select(&input_selector));

    any_nested(forms, is_password_input)
}

fn is_password_input(input: &ElementRef<'_>) -> bool {
    input
        .value()
        .attr("type")
        .is_some_and(|kind| kind.eq_ignore_ascii_case("password"))
}

/// First-match search over a two-level sequence
///
/// Returns as soon as `predicate` accepts an item; nothing after the match is
/// visited, in the current group or any later one.
pub fn any_nested<O, I, T, F>(groups: O, mut predicate: F) -> bool
where
    O: IntoIterator<Item = I>,
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> bool,
{
    groups
        .into_iter()
        .any(|group| group.into_iter().any(|item| predicate(&item)))
}
