//! Metadata module describing what a crawl extracts from a page
//!
//! # Components
//!
//! - `HtmlVersion`: HTML version classified from the doctype declaration
//! - `PageMetadata`: The record produced by one successful crawl

mod html_version;
mod page_metadata;

// Re-export main types
pub use html_version::HtmlVersion;
pub use page_metadata::PageMetadata;
