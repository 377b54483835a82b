//! Core domain logic for the bookshelf manager.
//! This crate owns the book collection and every invariant on it; hosts
//! supply rendering and notification collaborators.

pub mod collection;
pub mod controller;
pub mod logging;
pub mod model;
pub mod storage;
pub mod view;

pub use collection::book_collection::{
    BookCollection, CollectionError, CollectionResult, IdClock, SystemClock,
};
pub use controller::notice::{Notice, Notifier, CLEAR_ALL_PROMPT};
pub use controller::shelf_controller::{BookForm, FormMode, FormOutcome, ShelfController};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::book::{normalize_year, Book, BookField, BookId, BookValidationError};
pub use storage::book_storage::{BookStorage, LoadedSnapshot, STORAGE_KEY};
pub use storage::kv_store::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
pub use storage::{StorageError, StorageResult};
pub use view::shelf_view::{BookAction, BookItemView, ShelfCounts, ShelfRenderer, ShelfView};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
