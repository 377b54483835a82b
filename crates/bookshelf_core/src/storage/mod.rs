//! Durable key-value storage and the book snapshot adapter.
//!
//! # Responsibility
//! - Define the key-value contract the snapshot adapter writes through.
//! - Serialize the whole collection into one named slot and read it back.
//!
//! # Invariants
//! - Persistence is a full-snapshot overwrite, never incremental.
//! - A missing store is a mode (memory-only), not a failure.

pub mod book_storage;
pub mod kv_store;

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage-layer error for key-value access and snapshot decoding.
#[derive(Debug)]
pub enum StorageError {
    /// No durable store is attached in this environment.
    Unavailable,
    Io(std::io::Error),
    Sqlite(rusqlite::Error),
    /// The store file was written by a newer build.
    UnsupportedSchemaVersion { found: u32, supported: u32 },
    Serialization(serde_json::Error),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "durable storage is not available"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "store schema version {found} is newer than supported {supported}"
            ),
            Self::Serialization(err) => write!(f, "invalid stored snapshot: {err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Sqlite(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::Unavailable | Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}
