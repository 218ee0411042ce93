//! Crawl engine - runs one page through the extraction pipeline
//!
//! fetch → doctype sniff → DOM parse → structural analysis → link health
//! sampling → assembled `PageMetadata`.
//!
//! The body is fetched once and buffered; the doctype sniff and the DOM
//! parse both read the same buffer.

use crate::config::Config;
use crate::crawler::analyzer::{analyze_markup, PageAnalysis};
use crate::crawler::doctype::sniff_doctype;
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::link_check::LinkChecker;
use crate::crawler::parser::decode_body;
use crate::metadata::{HtmlVersion, PageMetadata};
use crate::PageMetaError;
use reqwest::Client;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Extracts page metadata. Cheap to clone; clones share the HTTP client.
#[derive(Debug, Clone)]
pub struct Crawler {
    client: Client,
    fetch_timeout: Duration,
    max_body_bytes: usize,
    link_checker: LinkChecker,
}

impl Crawler {
    /// Creates a crawler with its own HTTP client
    pub fn new(config: &Config) -> Result<Self, PageMetaError> {
        let client = build_http_client(&config.fetcher)?;
        Ok(Self::with_client(client, config))
    }

    /// Creates a crawler around an existing HTTP client
    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            link_checker: LinkChecker::new(client.clone(), &config.link_check),
            client,
            fetch_timeout: Duration::from_secs(config.fetcher.timeout_secs),
            max_body_bytes: config.fetcher.max_body_bytes,
        }
    }

    /// Crawls one page
    ///
    /// # Returns
    ///
    /// * `Ok(PageMetadata)` - The page was fetched and parsed; link probe
    ///   failures are reported inside `broken_links`
    /// * `Err(PageMetaError)` - The page fetch or parse failed; no metadata
    pub async fn crawl(&self, url: &Url) -> Result<PageMetadata, PageMetaError> {
        self.crawl_with_cancel(url, &CancellationToken::new()).await
    }

    /// Crawls one page, aborting promptly when `cancel` fires
    ///
    /// Cancelling drops the primary fetch and aborts in-flight link probes.
    /// A cancelled crawl is an error, never partial metadata.
    pub async fn crawl_with_cancel(
        &self,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<PageMetadata, PageMetaError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::warn!("Crawl cancelled: {}", url);
                Err(PageMetaError::Cancelled { url: url.to_string() })
            }
            result = self.run(url) => result,
        }
    }

    async fn run(&self, url: &Url) -> Result<PageMetadata, PageMetaError> {
        tracing::debug!("Fetching {}", url);
        let body = fetch_page(&self.client, url, self.fetch_timeout, self.max_body_bytes).await?;

        let markup = decode_body(url, &body)?;
        let doctype = sniff_doctype(&markup);
        let analysis = analyze_markup(&markup, url);

        let broken_links = self.link_checker.check(url, &analysis.anchors).await;

        let metadata = assemble_metadata(&doctype, analysis, broken_links);
        tracing::info!(
            "Metadata crawled for {}: {} internal, {} external, {} broken",
            url,
            metadata.internal_links,
            metadata.external_links,
            metadata.broken_links.len()
        );
        Ok(metadata)
    }
}

/// Merges the doctype, the structural analysis and the broken-link sample
pub fn assemble_metadata(
    doctype: &str,
    analysis: PageAnalysis,
    broken_links: Vec<String>,
) -> PageMetadata {
    PageMetadata {
        html_version: HtmlVersion::classify(doctype),
        title: analysis.title,
        h1_count: analysis.h1_count,
        h2_count: analysis.h2_count,
        h3_count: analysis.h3_count,
        internal_links: analysis.internal_links,
        external_links: analysis.external_links,
        broken_links,
        has_login_form: analysis.has_login_form,
    }
}
