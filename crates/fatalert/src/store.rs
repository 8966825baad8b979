//! Error Store - SQLite-backed fatal error log
//!
//! Append-only history of captured fatal errors, queryable by the log viewer:
//! - errors: one row per captured fatal, immutable after insert
//! - meta: key-value metadata (throttle ledger lives here)
//!
//! Concurrent writers across processes are serialized by SQLite itself (WAL
//! journal, autoincrement insert); no in-process locking is needed because a
//! process performs at most one capture.

use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::kind::ErrorKind;

/// Default error log database path
pub const ERROR_DB_PATH: &str = "/var/lib/fatalert/errors.db";

/// A captured fatal error, before the store assigns id and timestamp
#[derive(Debug, Clone)]
pub struct NewError {
    pub signature: String,
    pub kind: ErrorKind,
    pub message: String,
    pub file: String,
    pub line: u32,
    pub url: String,
    pub user_id: u64,
    pub runtime_mode: String,
}

/// A stored fatal error record
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    /// Store-assigned id, strictly increasing in insertion order
    pub id: i64,
    /// Server-set capture timestamp
    pub created_utc: DateTime<Utc>,
    pub signature: String,
    pub kind: ErrorKind,
    pub message: String,
    pub file: String,
    pub line: u32,
    pub url: String,
    pub user_id: u64,
    pub runtime_mode: String,
}

/// SQLite-backed error log
pub struct ErrorStore {
    conn: Connection,
}

impl ErrorStore {
    /// Open or create the error log at the default path
    pub fn open() -> Result<Self> {
        Self::open_at(ERROR_DB_PATH)
    }

    /// Open at a specific path (for testing or embedded hosts)
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        if let Some(parent) = path_ref.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path_ref)?;

        // WAL mode for concurrent capture processes
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS errors (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_utc INTEGER NOT NULL,
                signature TEXT NOT NULL,
                error_code INTEGER NOT NULL,
                message TEXT NOT NULL,
                file TEXT NOT NULL DEFAULT '',
                line INTEGER NOT NULL DEFAULT 0,
                url TEXT NOT NULL DEFAULT '',
                user_id INTEGER NOT NULL DEFAULT 0,
                runtime_mode TEXT NOT NULL DEFAULT ''
            );

            CREATE INDEX IF NOT EXISTS idx_errors_signature ON errors(signature);
            CREATE INDEX IF NOT EXISTS idx_errors_created ON errors(created_utc);

            CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;

        Ok(Self { conn })
    }

    /// Append a captured error, stamping the current UTC time.
    /// Returns the assigned id.
    pub fn insert(&self, new: &NewError) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO errors (created_utc, signature, error_code, message, file, line, url, user_id, runtime_mode)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                Utc::now().timestamp(),
                &new.signature,
                new.kind.code(),
                &new.message,
                &new.file,
                new.line,
                &new.url,
                new.user_id as i64,
                &new.runtime_mode,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Total records currently stored
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM errors", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// One page of records, most recent first (descending by id).
    /// Stateless with respect to offset; page_size is clamped to >= 1.
    pub fn list_page(&self, page_size: u64, offset: u64) -> Result<Vec<ErrorRecord>> {
        let page_size = page_size.max(1);

        let mut stmt = self.conn.prepare(
            "SELECT id, created_utc, signature, error_code, message, file, line, url, user_id, runtime_mode
             FROM errors ORDER BY id DESC LIMIT ?1 OFFSET ?2",
        )?;

        let rows = stmt.query_map(params![page_size as i64, offset as i64], row_to_record)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Fetch a single record by id
    pub fn get(&self, id: i64) -> Result<Option<ErrorRecord>> {
        let result = self.conn.query_row(
            "SELECT id, created_utc, signature, error_code, message, file, line, url, user_id, runtime_mode
             FROM errors WHERE id = ?1",
            params![id],
            row_to_record,
        );
        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Irreversibly remove every record. Throttle history in the meta table
    /// is independent and untouched.
    pub fn clear_all(&self) -> Result<()> {
        self.conn.execute("DELETE FROM errors", [])?;
        Ok(())
    }

    /// Set a metadata value
    pub fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Get a metadata value
    pub fn get_meta(&self, key: &str) -> Result<Option<String>> {
        let result: Result<String, _> = self.conn.query_row(
            "SELECT value FROM meta WHERE key = ?1",
            params![key],
            |row| row.get(0),
        );
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<ErrorRecord> {
    let ts: i64 = row.get(1)?;
    Ok(ErrorRecord {
        id: row.get(0)?,
        created_utc: DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default(),
        signature: row.get(2)?,
        kind: ErrorKind::from_code(row.get::<_, i64>(3)? as u32),
        message: row.get(4)?,
        file: row.get(5)?,
        line: row.get::<_, i64>(6)? as u32,
        url: row.get(7)?,
        user_id: row.get::<_, i64>(8)? as u64,
        runtime_mode: row.get(9)?,
    })
}
