//! Storage module for persisting crawl records
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Upserting crawl outcomes keyed by normalized URL
//! - Listing and deleting records

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::metadata::PageMetadata;
use serde::{Deserialize, Serialize};

/// A stored crawl outcome for one normalized URL
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrawlRecord {
    pub id: i64,
    pub url: String,
    pub status: CrawlStatus,
    pub created_at: String,
    pub last_crawled_at: String,
    /// None when the last crawl failed
    #[serde(flatten)]
    pub metadata: Option<PageMetadata>,
}

/// Outcome of the last crawl attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlStatus {
    Done,
    Failed,
}

impl CrawlStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "done" => Some(Self::Done),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}
