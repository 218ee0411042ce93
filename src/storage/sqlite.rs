//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::metadata::{HtmlVersion, PageMetadata};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{CrawlRecord, CrawlStatus};
use crate::PageMetaError;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Params, Row};
use std::path::Path;

const SELECT_COLUMNS: &str = "SELECT id, url, status, html_version, title, h1_count, h2_count,
    h3_count, internal_links, external_links, broken_links, has_login_form, created_at,
    last_crawled_at FROM crawl_records";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates the database at `path`
    pub fn new(path: &Path) -> Result<Self, PageMetaError> {
        let conn = Connection::open(path).map_err(StorageError::from)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )
        .map_err(StorageError::from)?;

        initialize_schema(&conn).map_err(StorageError::from)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, PageMetaError> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        initialize_schema(&conn).map_err(StorageError::from)?;
        Ok(Self { conn })
    }

    fn query_one<P: Params>(&self, clause: &str, params: P) -> StorageResult<Option<CrawlRecord>> {
        let sql = format!("{} {}", SELECT_COLUMNS, clause);
        let record = self
            .conn
            .query_row(&sql, params, row_to_record)
            .optional()?;
        Ok(record)
    }
}

impl Storage for SqliteStorage {
    fn find_by_url(&self, url: &str) -> StorageResult<Option<CrawlRecord>> {
        self.query_one("WHERE url = ?1", params![url])
    }

    fn get(&self, id: i64) -> StorageResult<Option<CrawlRecord>> {
        self.query_one("WHERE id = ?1", params![id])
    }

    fn upsert(
        &mut self,
        url: &str,
        metadata: Option<&PageMetadata>,
        status: CrawlStatus,
        timestamp: DateTime<Utc>,
    ) -> StorageResult<CrawlRecord> {
        let now = format_timestamp(timestamp);
        let broken_links = metadata
            .map(|m| serde_json::to_string(&m.broken_links))
            .transpose()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        self.conn.execute(
            "INSERT INTO crawl_records (
                url, status, html_version, title, h1_count, h2_count, h3_count,
                internal_links, external_links, broken_links, has_login_form,
                created_at, last_crawled_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)
            ON CONFLICT(url) DO UPDATE SET
                status = excluded.status,
                html_version = excluded.html_version,
                title = excluded.title,
                h1_count = excluded.h1_count,
                h2_count = excluded.h2_count,
                h3_count = excluded.h3_count,
                internal_links = excluded.internal_links,
                external_links = excluded.external_links,
                broken_links = excluded.broken_links,
                has_login_form = excluded.has_login_form,
                last_crawled_at = excluded.last_crawled_at",
            params![
                url,
                status.to_db_string(),
                metadata.map(|m| m.html_version.as_str()),
                metadata.map(|m| m.title.as_str()),
                metadata.map(|m| m.h1_count),
                metadata.map(|m| m.h2_count),
                metadata.map(|m| m.h3_count),
                metadata.map(|m| m.internal_links),
                metadata.map(|m| m.external_links),
                broken_links,
                metadata.map(|m| m.has_login_form),
                now,
            ],
        )?;

        self.find_by_url(url)?
            .ok_or_else(|| StorageError::Database(format!("Upserted record missing for {}", url)))
    }

    fn list_all(&self) -> StorageResult<Vec<CrawlRecord>> {
        let sql = format!("{} ORDER BY last_crawled_at DESC, id DESC", SELECT_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;

        let records = stmt
            .query_map([], row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn delete_by_id(&mut self, id: i64) -> StorageResult<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM crawl_records WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    fn delete_all(&mut self) -> StorageResult<usize> {
        let deleted = self.conn.execute("DELETE FROM crawl_records", [])?;
        Ok(deleted)
    }
}

/// Fixed-width UTC timestamps, so text order matches time order
fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<CrawlRecord> {
    let status: String = row.get(2)?;
    let status = CrawlStatus::from_db_string(&status)
        .ok_or_else(|| conversion_error(2, format!("unknown status '{}'", status)))?;

    let html_version: Option<String> = row.get(3)?;
    let metadata = match html_version {
        Some(label) => {
            let html_version = HtmlVersion::from_label(&label)
                .ok_or_else(|| conversion_error(3, format!("unknown html version '{}'", label)))?;
            let broken_links: Option<String> = row.get(10)?;
            let broken_links = match broken_links {
                Some(json) => serde_json::from_str(&json).map_err(|e| conversion_error(10, e.to_string()))?,
                None => Vec::new(),
            };

            Some(PageMetadata {
                html_version,
                title: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                h1_count: row.get::<_, Option<u32>>(5)?.unwrap_or_default(),
                h2_count: row.get::<_, Option<u32>>(6)?.unwrap_or_default(),
                h3_count: row.get::<_, Option<u32>>(7)?.unwrap_or_default(),
                internal_links: row.get::<_, Option<u32>>(8)?.unwrap_or_default(),
                external_links: row.get::<_, Option<u32>>(9)?.unwrap_or_default(),
                broken_links,
                has_login_form: row.get::<_, Option<bool>>(11)?.unwrap_or_default(),
            })
        }
        None => None,
    };

    Ok(CrawlRecord {
        id: row.get(0)?,
        url: row.get(1)?,
        status,
        created_at: row.get(12)?,
        last_crawled_at: row.get(13)?,
        metadata,
    })
}

fn conversion_error(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, message.into())
}
