//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::metadata::PageMetadata;
use crate::storage::{CrawlRecord, CrawlStatus};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for crawl record storage backends
///
/// Records are keyed by normalized URL; at most one record exists per URL.
pub trait Storage {
    /// Finds the record for a normalized URL
    fn find_by_url(&self, url: &str) -> StorageResult<Option<CrawlRecord>>;

    /// Gets a record by ID
    fn get(&self, id: i64) -> StorageResult<Option<CrawlRecord>>;

    /// Inserts or updates the record for a normalized URL
    ///
    /// # Arguments
    ///
    /// * `url` - The normalized URL
    /// * `metadata` - Extracted metadata, or None for a failed crawl
    /// * `status` - Outcome of the crawl
    /// * `timestamp` - Time of the crawl attempt
    ///
    /// # Returns
    ///
    /// The stored record. `created_at` is set on first insert only;
    /// `last_crawled_at` is set to `timestamp` every time.
    fn upsert(
        &mut self,
        url: &str,
        metadata: Option<&PageMetadata>,
        status: CrawlStatus,
        timestamp: DateTime<Utc>,
    ) -> StorageResult<CrawlRecord>;

    /// Lists every record, most recently crawled first
    fn list_all(&self) -> StorageResult<Vec<CrawlRecord>>;

    /// Deletes a record; returns false if it did not exist
    fn delete_by_id(&mut self, id: i64) -> StorageResult<bool>;

    /// Deletes every record and returns how many were removed
    fn delete_all(&mut self) -> StorageResult<usize>;
}
