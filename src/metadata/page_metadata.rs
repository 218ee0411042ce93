use crate::metadata::HtmlVersion;
use serde::{Deserialize, Serialize};

/// Structural metadata extracted from one page
///
/// Built fresh by every crawl. The serialized field names are a stable wire
/// contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub html_version: HtmlVersion,
    pub title: String,
    pub h1_count: u32,
    pub h2_count: u32,
    pub h3_count: u32,
    pub internal_links: u32,
    pub external_links: u32,
    /// Absolute URLs that failed the health check, in document order
    pub broken_links: Vec<String>,
    pub has_login_form: bool,
}
