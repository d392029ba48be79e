//! Durable key-value storage backing the record store.
//!
//! The store keeps each collection as one JSON document under a fixed key,
//! so any backend that can get and atomically put strings will do.

use std::collections::HashMap;
use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use closet_core::error::ClosetError;

/// Key holding the JSON array of pieces.
pub const PIECES_KEY: &str = "wardrobe_pieces";
/// Key holding the JSON array of outfits.
pub const OUTFITS_KEY: &str = "wardrobe_outfits";
/// Key holding the provider API key, in plaintext.
pub const API_KEY_KEY: &str = "ai_apiKey";
/// Key holding the selected provider name.
pub const PROVIDER_KEY: &str = "ai_apiProvider";

/// Default storage file name inside a data directory.
pub const STORE_FILE: &str = "closet.db";

/// String-keyed storage with atomic multi-key writes.
pub trait KeyValueStore {
    /// Read a value, `None` if the key was never written.
    ///
    /// # Errors
    ///
    /// Returns [`ClosetError::Storage`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, ClosetError>;

    /// Write all entries, or none of them.
    ///
    /// # Errors
    ///
    /// Returns [`ClosetError::Storage`] if the write fails; no entry is
    /// visible afterwards.
    fn put_many(&mut self, entries: &[(&str, &str)]) -> Result<(), ClosetError>;

    /// Write a single entry.
    ///
    /// # Errors
    ///
    /// See [`KeyValueStore::put_many`].
    fn put(&mut self, key: &str, value: &str) -> Result<(), ClosetError> {
        self.put_many(&[(key, value)])
    }
}

/// SQLite-backed storage: one `kv` table in a single database file.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open or create a storage database at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ClosetError::Storage`] if the database cannot be opened.
    pub fn open(path: &Path) -> Result<Self, ClosetError> {
        let conn = Connection::open(path).map_err(storage_err)?;
        let storage = Self { conn };
        storage.create_schema()?;
        Ok(storage)
    }

    /// Create an in-memory database (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns [`ClosetError::Storage`] if schema creation fails.
    pub fn in_memory() -> Result<Self, ClosetError> {
        let conn = Connection::open_in_memory().map_err(storage_err)?;
        let storage = Self { conn };
        storage.create_schema()?;
        Ok(storage)
    }

    fn create_schema(&self) -> Result<(), ClosetError> {
        self.conn
            .execute_batch(
                "
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
            )
            .map_err(storage_err)?;
        Ok(())
    }

    /// Number of stored keys.
    ///
    /// # Errors
    ///
    /// Returns [`ClosetError::Storage`] if the query fails.
    pub fn count(&self) -> Result<u64, ClosetError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))
            .map_err(storage_err)?;
        Ok(count as u64)
    }
}

impl KeyValueStore for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>, ClosetError> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(storage_err)
    }

    fn put_many(&mut self, entries: &[(&str, &str)]) -> Result<(), ClosetError> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction().map_err(storage_err)?;
        for (key, value) in entries {
            tx.execute(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                                updated_at = excluded.updated_at",
                params![key, value, now],
            )
            .map_err(storage_err)?;
        }
        tx.commit().map_err(storage_err)?;
        Ok(())
    }
}

fn storage_err(err: rusqlite::Error) -> ClosetError {
    ClosetError::Storage(err.to_string())
}

/// Process-local storage. Nothing survives the value being dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, ClosetError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put_many(&mut self, entries: &[(&str, &str)]) -> Result<(), ClosetError> {
        for (key, value) in entries {
            self.entries.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }
}
