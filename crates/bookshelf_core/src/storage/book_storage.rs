//! Snapshot adapter between the book collection and a key-value slot.
//!
//! # Responsibility
//! - Write the full collection as JSON under one storage key.
//! - Read it back, tolerating older snapshot shapes.
//!
//! # Invariants
//! - `save` never fails the caller; failures are logged.
//! - `load` on an empty slot returns an empty list.

use super::kv_store::KeyValueStore;
use super::{StorageError, StorageResult};
use crate::model::book::Book;
use log::{error, info, warn};
use serde_json::Value;

/// Storage key holding the book snapshot.
pub const STORAGE_KEY: &str = "BOOKSHELF_APPS";

/// Books read from the slot plus the number of records that did not decode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedSnapshot {
    pub books: Vec<Book>,
    pub skipped: usize,
}

/// Storage adapter over an optional durable store.
pub struct BookStorage {
    store: Option<Box<dyn KeyValueStore>>,
    key: String,
}

impl BookStorage {
    /// Creates an adapter writing to [`STORAGE_KEY`].
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self::with_key(store, STORAGE_KEY)
    }

    /// Creates an adapter writing to a custom slot.
    pub fn with_key(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store: Some(store),
            key: key.into(),
        }
    }

    /// Creates an adapter with no durable store; the session is memory-only.
    pub fn unavailable() -> Self {
        Self {
            store: None,
            key: STORAGE_KEY.to_string(),
        }
    }

    /// Capability check: whether a durable store is attached.
    pub fn is_available(&self) -> bool {
        self.store.is_some()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Overwrites the slot with the full snapshot.
    ///
    /// Memory-only sessions skip silently; write failures are logged.
    pub fn save(&mut self, books: &[Book]) {
        let Some(store) = self.store.as_mut() else {
            return;
        };

        let encoded = match serde_json::to_string(books) {
            Ok(encoded) => encoded,
            Err(err) => {
                error!(
                    "event=snapshot_save_failed module=storage status=error error_code=encode_failed error={err}"
                );
                return;
            }
        };

        match store.set(&self.key, &encoded) {
            Ok(()) => info!(
                "event=snapshot_saved module=storage status=ok books={} bytes={}",
                books.len(),
                encoded.len()
            ),
            Err(err) => error!(
                "event=snapshot_save_failed module=storage status=error error_code=write_failed error={err}"
            ),
        }
    }

    /// Reads the slot back into books, dropping undecodable records.
    ///
    /// # Errors
    /// Same as [`BookStorage::load_snapshot`].
    pub fn load(&self) -> StorageResult<Vec<Book>> {
        self.load_snapshot().map(|snapshot| snapshot.books)
    }

    /// Reads the slot back record by record.
    ///
    /// A record that does not decode (for example a `null` year) is logged
    /// and counted in `skipped`; the remaining books keep their order.
    ///
    /// # Errors
    /// - `Unavailable` when no store is attached.
    /// - `Sqlite` when the store cannot be read.
    /// - `Serialization` when the slot is not a JSON list.
    pub fn load_snapshot(&self) -> StorageResult<LoadedSnapshot> {
        let store = self.store.as_ref().ok_or(StorageError::Unavailable)?;

        let Some(encoded) = store.get(&self.key)? else {
            info!("event=snapshot_loaded module=storage status=empty books=0");
            return Ok(LoadedSnapshot::default());
        };

        // A stored JSON `null` reads the same as an absent slot.
        let records: Option<Vec<Value>> = serde_json::from_str(&encoded).map_err(|err| {
            warn!(
                "event=snapshot_loaded module=storage status=error error_code=decode_failed error={err}"
            );
            err
        })?;

        let mut snapshot = LoadedSnapshot::default();
        for (index, record) in records.unwrap_or_default().into_iter().enumerate() {
            match serde_json::from_value::<Book>(record) {
                Ok(book) => snapshot.books.push(book),
                Err(err) => {
                    warn!(
                        "event=snapshot_record_skipped module=storage status=error index={index} error={err}"
                    );
                    snapshot.skipped += 1;
                }
            }
        }
        info!(
            "event=snapshot_loaded module=storage status=ok books={} skipped={}",
            snapshot.books.len(),
            snapshot.skipped
        );
        Ok(snapshot)
    }
}
