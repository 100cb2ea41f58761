//! SQLite record sink
//!
//! Single `records` table, one row per pushed record. Useful when the
//! downstream consumer wants to query by field instead of replaying a
//! JSONL stream.

use crate::extract::Record;
use crate::output::traits::{Sink, SinkError, SinkResult};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS records (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    price       TEXT,
    rating      TEXT,
    listing_id  TEXT,
    source_url  TEXT NOT NULL,
    scraped_at  TEXT NOT NULL
);
";

/// Sink writing records to a SQLite database
pub struct SqliteSink {
    conn: Mutex<Connection>,
}

impl SqliteSink {
    /// Opens (or creates) the database at `path` and ensures the schema
    pub fn new<P: AsRef<Path>>(path: P) -> SinkResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory database, for tests
    pub fn in_memory() -> SinkResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Number of stored records
    pub fn record_count(&self) -> SinkResult<u64> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SinkError::Write(format!("connection lock poisoned: {}", e)))?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

impl Sink for SqliteSink {
    fn push(&self, record: &Record) -> SinkResult<()> {
        // Only valid records reach a sink; a missing title here is a bug
        // in the extractor, not bad input.
        let title = record
            .title
            .as_deref()
            .ok_or_else(|| SinkError::Write("record without title".to_string()))?;

        let conn = self
            .conn
            .lock()
            .map_err(|e| SinkError::Write(format!("connection lock poisoned: {}", e)))?;

        conn.execute(
            "INSERT INTO records (title, price, rating, listing_id, source_url, scraped_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                title,
                record.price,
                record.rating,
                record.id,
                record.source_url,
                record.scraped_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }
}
