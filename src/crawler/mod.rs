//! Crawler module for page metadata extraction
//!
//! This module contains the extraction pipeline, including:
//! - HTTP fetching with a bounded, buffered body
//! - Doctype sniffing over raw markup tokens
//! - HTML parsing and structural analysis
//! - Link health sampling
//! - Assembly of the final `PageMetadata`

mod analyzer;
mod doctype;
mod engine;
mod fetcher;
mod link_check;
mod parser;

pub use analyzer::{analyze, analyze_markup, any_nested, count_links, detect_login_form, PageAnalysis};
pub use doctype::{sniff_doctype, Token, Tokens};
pub use engine::{assemble_metadata, Crawler};
pub use fetcher::{build_http_client, fetch_page, probe_link};
pub use link_check::{LinkChecker, LinkProbeError};
pub use parser::{anchor_hrefs, decode_body, extract_title, parse_html};
