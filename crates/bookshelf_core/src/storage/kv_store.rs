//! Key-value store contract and implementations.

use super::{StorageError, StorageResult};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Schema version written to `PRAGMA user_version`.
pub const KV_SCHEMA_VERSION: u32 = 1;

const KV_SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS kv_entries (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
);";

/// Durable string slot storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
}

/// SQLite-backed key-value store over the `kv_entries` table.
pub struct SqliteKeyValueStore {
    conn: Connection,
}

impl SqliteKeyValueStore {
    /// Opens (or creates) the store file, creating parent directories.
    ///
    /// # Errors
    /// - `UnsupportedSchemaVersion` when the file comes from a newer build.
    /// - `Io` / `Sqlite` when the file cannot be created or opened.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let started_at = Instant::now();
        let result = Self::open_file(path.as_ref());
        log_open("file", started_at, &result);
        result
    }

    /// Opens a private in-memory store.
    pub fn open_in_memory() -> StorageResult<Self> {
        let started_at = Instant::now();
        let result = Connection::open_in_memory()
            .map_err(StorageError::from)
            .and_then(Self::with_schema);
        log_open("memory", started_at, &result);
        result
    }

    fn open_file(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        Self::with_schema(conn)
    }

    fn with_schema(conn: Connection) -> StorageResult<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if found > KV_SCHEMA_VERSION {
            return Err(StorageError::UnsupportedSchemaVersion {
                found,
                supported: KV_SCHEMA_VERSION,
            });
        }
        if found < KV_SCHEMA_VERSION {
            conn.execute_batch(&format!(
                "BEGIN;\n{KV_SCHEMA_SQL}\nPRAGMA user_version = {KV_SCHEMA_VERSION};\nCOMMIT;"
            ))?;
        }
        Ok(Self { conn })
    }

    /// Schema version recorded in the open store.
    pub fn schema_version(&self) -> StorageResult<u32> {
        Ok(self
            .conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))?)
    }
}

fn log_open(mode: &str, started_at: Instant, result: &StorageResult<SqliteKeyValueStore>) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(_) => info!("event=store_open module=storage status=ok mode={mode} duration_ms={duration_ms}"),
        Err(err) => error!(
            "event=store_open module=storage status=error mode={mode} duration_ms={duration_ms} error={err}"
        ),
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Process-local store.
///
/// Clones share the same entries, so a caller can keep a handle after
/// moving the store into a controller.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
