//! pagemeta: structural metadata for a single web page
//!
//! This crate fetches a page, sniffs its doctype, parses the DOM and derives
//! heading counts, link classification, login-form presence and a sample of
//! broken outbound links. Results are stored one row per normalized URL and
//! served over a small REST API.

pub mod config;
pub mod crawler;
pub mod metadata;
pub mod server;
pub mod service;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for pagemeta operations
#[derive(Debug, Error)]
pub enum PageMetaError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] UrlError),

    #[error("Fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTML parse error for {url}: {message}")]
    HtmlParse { url: String, message: String },

    #[error("Crawl of {url} was cancelled")]
    Cancelled { url: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Record not found: {0}")]
    NotFound(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PageMetaError {
    /// Returns true if this error means the crawl itself failed, as opposed
    /// to the request being rejected or the store misbehaving.
    pub fn is_crawl_failure(&self) -> bool {
        matches!(
            self,
            Self::Fetch { .. } | Self::Timeout { .. } | Self::HtmlParse { .. } | Self::Cancelled { .. }
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for pagemeta operations
pub type Result<T> = std::result::Result<T, PageMetaError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::Crawler;
pub use metadata::{HtmlVersion, PageMetadata};
pub use service::CrawlService;
pub use crate::url::normalize_url;
