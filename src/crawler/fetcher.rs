//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made by a crawl:
//! - Building the shared HTTP client with the browser-like user agent
//! - GET requests that buffer the page body once, bounded by a size guard
//! - HEAD probes used by the link health check
//! - Error classification

use crate::config::FetcherConfig;
use crate::crawler::link_check::LinkProbeError;
use crate::PageMetaError;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Builds the HTTP client shared by the page fetch and every link probe
///
/// Timeouts are applied per request, so one client serves both.
///
/// # Example
///
/// ```no_run
/// use pagemeta::config::FetcherConfig;
/// use pagemeta::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .connect_timeout(Duration::from_secs(config.timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and returns its raw body
///
/// # Failure Modes
///
/// | Condition | Error |
/// |-----------|-------|
/// | Timeout (connect or body) | `Timeout` |
/// | Connection/DNS/TLS failure | `Fetch` |
/// | Non-2xx status | `Fetch` |
/// | Body larger than `max_body_bytes` | `Fetch` |
pub async fn fetch_page(
    client: &Client,
    url: &Url,
    timeout: Duration,
    max_body_bytes: usize,
) -> Result<Vec<u8>, PageMetaError> {
    let mut response = client
        .get(url.clone())
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(PageMetaError::Fetch {
            url: url.to_string(),
            message: format!("HTTP {}", status.as_u16()),
        });
    }

    if let Some(length) = response.content_length() {
        if length > max_body_bytes as u64 {
            return Err(body_too_large(url, max_body_bytes));
        }
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(|e| classify_error(url, e))? {
        if body.len() + chunk.len() > max_body_bytes {
            return Err(body_too_large(url, max_body_bytes));
        }
        body.extend_from_slice(&chunk);
    }

    tracing::debug!("Fetched {} bytes from {}", body.len(), url);
    Ok(body)
}

/// Sends a HEAD probe to check that a link resolves
///
/// Any transport failure or a status of 400 and above is reported as an error.
pub async fn probe_link(client: &Client, url: &Url, timeout: Duration) -> Result<(), LinkProbeError> {
    let response = client
        .head(url.clone())
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                LinkProbeError::Timeout
            } else {
                LinkProbeError::Request(e.to_string())
            }
        })?;

    let status = response.status();
    if is_broken_status(status) {
        return Err(LinkProbeError::Status(status.as_u16()));
    }

    Ok(())
}

/// Client and server error statuses mark a link as broken
fn is_broken_status(status: StatusCode) -> bool {
    status.is_client_error() || status.is_server_error()
}

fn classify_error(url: &Url, error: reqwest::Error) -> PageMetaError {
    if error.is_timeout() {
        PageMetaError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        PageMetaError::Fetch {
            url: url.to_string(),
            message: "Connection refused".to_string(),
        }
    } else {
        PageMetaError::Fetch {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

fn body_too_large(url: &Url, max_body_bytes: usize) -> PageMetaError {
    PageMetaError::Fetch {
        url: url.to_string(),
        message: format!("response body exceeds {} bytes", max_body_bytes),
    }
}
