//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the pagemeta database.

/// SQL schema for the database
///
/// Metadata columns are NULL for failed crawls.
pub const SCHEMA_SQL: &str = r#"
-- One row per normalized URL
CREATE TABLE IF NOT EXISTS crawl_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    status TEXT NOT NULL,
    html_version TEXT,
    title TEXT,
    h1_count INTEGER,
    h2_count INTEGER,
    h3_count INTEGER,
    internal_links INTEGER,
    external_links INTEGER,
    broken_links TEXT,
    has_login_form INTEGER,
    created_at TEXT NOT NULL,
    last_crawled_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_crawl_records_last_crawled ON crawl_records(last_crawled_at);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
