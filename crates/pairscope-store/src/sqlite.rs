//! SQLite tick store.

use chrono::{DateTime, Utc};
use pairscope_types::{PairscopeError, Result, Tick};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, params};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::{StoreConfig, TickSink, TickSource, format_timestamp, parse_epoch, parse_timestamp};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS ticks (
    symbol TEXT,
    timestamp DATETIME,
    price REAL,
    qty REAL
);
CREATE INDEX IF NOT EXISTS idx_ticks_timestamp ON ticks(timestamp);
";

fn store_error(err: rusqlite::Error) -> PairscopeError {
    PairscopeError::store(err.to_string())
}

/// Tick store backed by a single SQLite table.
///
/// Timestamps are written as `YYYY-MM-DD HH:MM:SS.ffffff` UTC text so that
/// ordering by the column is chronological.
#[derive(Debug)]
pub struct SqliteTickStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteTickStore {
    /// Opens (or creates) the database at `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or database cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path).map_err(store_error)?;
        conn.execute_batch(SCHEMA).map_err(store_error)?;

        info!(path = %path.display(), "Opened tick store");

        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Opens the database described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        Self::open(config.path())
    }

    /// Opens a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite cannot allocate the database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(store_error)?;
        conn.execute_batch(SCHEMA).map_err(store_error)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Returns the database path, if on disk.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the total number of rows in the table.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM ticks", [], |row| row.get(0))
            .map_err(store_error)?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| PairscopeError::store("connection lock poisoned"))
    }
}

/// Reads a timestamp cell written as text or as a numeric epoch.
fn read_timestamp(value: ValueRef<'_>) -> Option<DateTime<Utc>> {
    match value {
        ValueRef::Text(bytes) => std::str::from_utf8(bytes).ok().and_then(parse_timestamp),
        ValueRef::Integer(epoch) => parse_epoch(epoch),
        ValueRef::Real(epoch) if epoch.is_finite() => parse_epoch(epoch.trunc() as i64),
        _ => None,
    }
}

impl TickSource for SqliteTickStore {
    fn snapshot(&self, limit: usize) -> Result<Vec<Tick>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT symbol, timestamp, price, qty FROM ticks \
                 ORDER BY timestamp DESC LIMIT ?1",
            )
            .map_err(store_error)?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(params![limit], |row| {
                let symbol: Option<String> = row.get(0)?;
                let timestamp = read_timestamp(row.get_ref(1)?);
                let price: Option<f64> = row.get(2)?;
                let qty: Option<f64> = row.get(3)?;
                Ok((symbol, timestamp, price, qty))
            })
            .map_err(store_error)?;

        let mut ticks = Vec::new();
        let mut dropped = 0usize;
        for row in rows {
            match row.map_err(store_error)? {
                (Some(symbol), Some(timestamp), Some(price), Some(qty)) if !symbol.is_empty() => {
                    ticks.push(Tick::new(symbol, timestamp, price, qty));
                }
                _ => dropped += 1,
            }
        }

        ticks.sort_by_key(|t| t.timestamp);
        debug!(ticks = ticks.len(), dropped, "Loaded tick snapshot");
        Ok(ticks)
    }
}

impl TickSink for SqliteTickStore {
    fn append(&self, ticks: &[Tick]) -> Result<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(store_error)?;
        {
            let mut stmt = tx
                .prepare_cached(
                    "INSERT INTO ticks (symbol, timestamp, price, qty) VALUES (?1, ?2, ?3, ?4)",
                )
                .map_err(store_error)?;
            for tick in ticks {
                stmt.execute(params![
                    tick.symbol,
                    format_timestamp(&tick.timestamp),
                    tick.price,
                    tick.quantity
                ])
                .map_err(store_error)?;
            }
        }
        tx.commit().map_err(store_error)?;
        Ok(ticks.len())
    }
}
