//! Link health checking
//!
//! Probes a bounded sample of a page's anchors and reports which ones are
//! broken. A failed probe is never a crawl failure: it only marks that link.

use crate::config::LinkCheckConfig;
use crate::crawler::fetcher::probe_link;
use crate::url::resolve_href;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Why a single link probe failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkProbeError {
    #[error("probe timed out")]
    Timeout,

    #[error("request failed: {0}")]
    Request(String),

    #[error("HTTP {0}")]
    Status(u16),
}

/// Checks the health of a page's outbound links
#[derive(Debug, Clone)]
pub struct LinkChecker {
    client: Client,
    sample_size: usize,
    concurrency: usize,
    timeout: Duration,
}

impl LinkChecker {
    pub fn new(client: Client, config: &LinkCheckConfig) -> Self {
        let sample_size = config.sample_size.max(1);
        Self {
            client,
            sample_size,
            concurrency: config.concurrency.clamp(1, sample_size),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Returns the broken links among the first `sample_size` anchors
    ///
    /// Anchors are the raw `a[href]` values in document order; no navigability
    /// filtering is applied. An href that cannot be resolved against `base`
    /// still counts towards the sample but is not probed. Probes run on a
    /// bounded pool and the result keeps document order.
    pub async fn check(&self, base: &Url, anchors: &[String]) -> Vec<String> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut probes = JoinSet::new();

        for (index, href) in anchors.iter().take(self.sample_size).enumerate() {
            let Some(target) = resolve_href(base, href) else {
                tracing::debug!("Skipping unresolvable href {:?}", href);
                continue;
            };

            let client = self.client.clone();
            let semaphore = semaphore.clone();
            let timeout = self.timeout;

            probes.spawn(async move {
                // The semaphore is never closed
                let _permit = semaphore.acquire_owned().await.ok();
                let outcome = probe_link(&client, &target, timeout).await;
                (index, target, outcome)
            });
        }

        let mut results = Vec::with_capacity(probes.len());
        while let Some(joined) = probes.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => tracing::warn!("Link probe task failed: {}", e),
            }
        }

        results.sort_by_key(|(index, _, _)| *index);

        results
            .into_iter()
            .filter_map(|(_, target, outcome)| match outcome {
                Ok(()) => None,
                Err(e) => {
                    tracing::debug!("Broken link {}: {}", target, e);
                    Some(target.to_string())
                }
            })
            .collect()
    }
}
