//! SQLite implementation of the BitStore trait.
//!
//! The persistent backend. It uses rusqlite with bundled SQLite, wrapped in
//! async via tokio::spawn_blocking. Each bit batch runs inside one immediate
//! transaction, which gives it the all-or-nothing behaviour the filters rely
//! on even with several processes sharing the database file.
//!
//! Bit commands go through SQLite's incremental blob I/O, so SETBIT and GETBIT
//! touch only the pages holding the addressed bytes. A bitmap is rewritten in
//! full only when a write lands past its current end.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use rusqlite::{params, Connection, DatabaseName, OptionalExtension, TransactionBehavior};

use crate::bitmap;
use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{BitBatch, BitStore};

/// How long a writer waits on another process's lock before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteBitStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteBitStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory SQLite database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking operation on the connection off the async runtime.
    async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock().map_err(|e| {
                StoreError::Database(rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
                    Some(format!("mutex poisoned: {}", e)),
                ))
            })?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("spawn_blocking failed: {}", e)))?
    }
}

fn select_value(conn: &Connection, key: &str) -> Result<Option<Vec<u8>>> {
    let value = conn
        .query_row(
            "SELECT value FROM entries WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

/// Row id and byte length of a value, without reading the value itself.
fn locate_row(conn: &Connection, key: &str) -> Result<Option<(i64, usize)>> {
    let row = conn
        .query_row(
            "SELECT rowid, length(value) FROM entries WHERE key = ?1",
            params![key],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
        )
        .optional()?;
    Ok(row.map(|(rowid, len)| (rowid, usize::try_from(len).unwrap_or(0))))
}

/// Make sure the value at `key` holds at least `len` bytes, returning its row id.
fn ensure_len(conn: &Connection, key: &str, len: usize) -> Result<i64> {
    match locate_row(conn, key)? {
        Some((rowid, current)) if current >= len => Ok(rowid),
        Some(_) => {
            let mut value = select_value(conn, key)?.unwrap_or_default();
            value.resize(len, 0);
            upsert_value(conn, key, &value)?;
            locate_row(conn, key)?.map(|(rowid, _)| rowid).ok_or_else(|| {
                StoreError::Unavailable(format!("value {key:?} vanished while growing"))
            })
        }
        None => {
            conn.execute(
                "INSERT INTO entries (key, value) VALUES (?1, zeroblob(?2))",
                params![key, len as i64],
            )?;
            Ok(conn.last_insert_rowid())
        }
    }
}

fn upsert_value(conn: &Connection, key: &str, value: &[u8]) -> Result<()> {
    conn.execute(
        "INSERT INTO entries (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

#[async_trait]
impl BitStore for SqliteBitStore {
    async fn exec_batch(&self, batch: &BitBatch) -> Result<()> {
        let located = bitmap::locate_all(batch.offsets())?;
        if located.is_empty() {
            return Ok(());
        }
        let key = batch.key().to_string();

        let len = located.iter().map(|&(byte, _)| byte).max().unwrap_or(0) + 1;

        self.run(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let rowid = ensure_len(&tx, &key, len)?;
            {
                let mut blob =
                    tx.blob_open(DatabaseName::Main, "entries", "value", rowid, false)?;
                let mut cell = [0u8; 1];
                for &(byte, mask) in &located {
                    blob.read_at_exact(&mut cell, byte)?;
                    cell[0] |= mask;
                    blob.write_at(&cell, byte)?;
                }
            }

            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn get_bit(&self, key: &str, offset: u64) -> Result<bool> {
        let (byte, mask) = bitmap::locate(offset)?;
        let key = key.to_string();

        self.run(move |conn| {
            let tx = conn.transaction()?;
            let Some((rowid, len)) = locate_row(&tx, &key)? else {
                return Ok(false);
            };
            if byte >= len {
                return Ok(false);
            }

            let blob = tx.blob_open(DatabaseName::Main, "entries", "value", rowid, true)?;
            let mut cell = [0u8; 1];
            blob.read_at_exact(&mut cell, byte)?;
            Ok(cell[0] & mask != 0)
        })
        .await
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        let key = key.to_string();
        self.run(move |conn| Ok(select_value(conn, &key)?.map(Bytes::from)))
            .await
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let key = key.to_string();
        let value = value.to_vec();
        self.run(move |conn| upsert_value(conn, &key, &value)).await
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> Result<bool> {
        let key = key.to_string();
        let expected = expected.map(<[u8]>::to_vec);
        let value = value.to_vec();

        self.run(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            if select_value(&tx, &key)? != expected {
                return Ok(false);
            }
            upsert_value(&tx, &key, &value)?;

            tx.commit()?;
            Ok(true)
        })
        .await
    }

    async fn del(&self, keys: &[&str]) -> Result<u64> {
        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();

        self.run(move |conn| {
            let tx = conn.transaction()?;
            let mut removed = 0u64;
            for key in &keys {
                removed += tx.execute("DELETE FROM entries WHERE key = ?1", params![key])? as u64;
            }
            tx.commit()?;
            Ok(removed)
        })
        .await
    }
}
