//! Crawl service - ties the crawler to the record store
//!
//! Every crawl attempt, successful or not, leaves exactly one record keyed by
//! the normalized URL. Invalid URLs are rejected before anything is stored.

use crate::config::Config;
use crate::crawler::Crawler;
use crate::metadata::PageMetadata;
use crate::storage::{CrawlRecord, CrawlStatus, SqliteStorage, Storage, StorageError};
use crate::url::{canonical_url, url_key};
use crate::PageMetaError;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// Result of one crawl attempt
#[derive(Debug)]
pub struct CrawlOutcome {
    /// The stored record after the attempt
    pub record: CrawlRecord,
    /// Why the crawl failed, if it did
    pub failure: Option<PageMetaError>,
}

impl CrawlOutcome {
    /// Metadata from a successful crawl
    pub fn metadata(&self) -> Option<&PageMetadata> {
        self.record.metadata.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Crawls pages and keeps their records. Cheap to clone.
#[derive(Clone)]
pub struct CrawlService {
    crawler: Crawler,
    storage: Arc<Mutex<SqliteStorage>>,
    shutdown: CancellationToken,
}

impl CrawlService {
    /// Creates a service from configuration, opening the configured database
    pub fn from_config(config: &Config) -> Result<Self, PageMetaError> {
        let crawler = Crawler::new(config)?;
        let storage = SqliteStorage::new(std::path::Path::new(&config.storage.database_path))?;
        Ok(Self::new(crawler, storage))
    }

    pub fn new(crawler: Crawler, storage: SqliteStorage) -> Self {
        Self {
            crawler,
            storage: Arc::new(Mutex::new(storage)),
            shutdown: CancellationToken::new(),
        }
    }

    /// Token that cancels every in-flight crawl when fired
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Normalizes `raw_url`, crawls it and stores the outcome
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOutcome)` - The attempt was recorded; check `failure`
    /// * `Err(PageMetaError::InvalidUrl)` - Nothing was crawled or stored
    /// * `Err(PageMetaError::Storage)` - The record could not be written
    pub async fn crawl_and_store(&self, raw_url: &str) -> Result<CrawlOutcome, PageMetaError> {
        let url = canonical_url(raw_url)?;
        let key = url_key(&url);

        tracing::info!("Crawling {}", key);
        let result = self.crawler.crawl_with_cancel(&url, &self.shutdown).await;
        let now = Utc::now();

        match result {
            Ok(metadata) => {
                let record =
                    self.with_storage(|s| s.upsert(&key, Some(&metadata), CrawlStatus::Done, now))?;
                Ok(CrawlOutcome {
                    record,
                    failure: None,
                })
            }
            Err(e) if e.is_crawl_failure() => {
                tracing::warn!("Crawl failed for {}: {}", key, e);
                let record = self.with_storage(|s| s.upsert(&key, None, CrawlStatus::Failed, now))?;
                Ok(CrawlOutcome {
                    record,
                    failure: Some(e),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Crawls the URL of an existing record again
    pub async fn recrawl(&self, id: i64) -> Result<CrawlOutcome, PageMetaError> {
        let record = self
            .with_storage(|s| s.get(id))?
            .ok_or(PageMetaError::NotFound(id))?;
        self.crawl_and_store(&record.url).await
    }

    /// All records, most recently crawled first
    pub fn list(&self) -> Result<Vec<CrawlRecord>, PageMetaError> {
        Ok(self.with_storage(|s| s.list_all())?)
    }

    pub fn get(&self, id: i64) -> Result<Option<CrawlRecord>, PageMetaError> {
        Ok(self.with_storage(|s| s.get(id))?)
    }

    pub fn delete(&self, id: i64) -> Result<(), PageMetaError> {
        if self.with_storage(|s| s.delete_by_id(id))? {
            tracing::info!("Deleted record {}", id);
            Ok(())
        } else {
            Err(PageMetaError::NotFound(id))
        }
    }

    /// Deletes every record and returns how many were removed
    pub fn delete_all(&self) -> Result<usize, PageMetaError> {
        let deleted = self.with_storage(|s| s.delete_all())?;
        tracing::info!("Deleted {} records", deleted);
        Ok(deleted)
    }

    // The guard never crosses an await point.
    fn with_storage<T>(
        &self,
        f: impl FnOnce(&mut SqliteStorage) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let mut storage = self
            .storage
            .lock()
            .map_err(|_| StorageError::Database("storage lock poisoned".to_string()))?;
        f(&mut storage)
    }
}
