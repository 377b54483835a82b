//! Book collection manager.
//!
//! # Responsibility
//! - Provide add/find/update/remove/search/clear over the ordered list.
//! - Assign fresh, unique, monotonic ids.
//!
//! # Invariants
//! - Ids are unique across the collection and never change.
//! - `add` rejects a duplicate (title, author, year) triple.
//! - `update` replaces fields in place without re-checking duplicates.

use crate::model::book::{Book, BookDraft, BookId, BookValidationError};
use chrono::Utc;
use log::{info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CollectionResult<T> = Result<T, CollectionError>;

/// Error returned by collection mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    Validation(BookValidationError),
    /// Another book already carries the same triple.
    DuplicateBook { existing: BookId },
    NotFound(BookId),
}

impl Display for CollectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateBook { existing } => {
                write!(f, "book already exists in the list (id {existing})")
            }
            Self::NotFound(id) => write!(f, "book not found: {id}"),
        }
    }
}

impl Error for CollectionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::DuplicateBook { .. } | Self::NotFound(_) => None,
        }
    }
}

impl From<BookValidationError> for CollectionError {
    fn from(value: BookValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Source of candidate ids for new books.
pub trait IdClock {
    fn now_millis(&self) -> BookId;
}

/// Wall-clock id source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl IdClock for SystemClock {
    fn now_millis(&self) -> BookId {
        Utc::now().timestamp_millis()
    }
}

/// Ordered, single-owner collection of books.
pub struct BookCollection<C: IdClock = SystemClock> {
    books: Vec<Book>,
    clock: C,
}

impl BookCollection<SystemClock> {
    /// Creates an empty collection using wall-clock ids.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for BookCollection<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: IdClock> BookCollection<C> {
    /// Creates an empty collection with a caller-provided id clock.
    pub fn with_clock(clock: C) -> Self {
        Self {
            books: Vec::new(),
            clock,
        }
    }

    /// Replaces the contents with a loaded snapshot, keeping order.
    pub fn replace_all(&mut self, books: Vec<Book>) {
        self.books = books;
    }

    /// Returns the current list in insertion order.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Returns an owned copy for persistence.
    pub fn snapshot(&self) -> Vec<Book> {
        self.books.clone()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Adds a new book from raw form input.
    ///
    /// # Contract
    /// - Input is trimmed; year is calendar-checked and stored as an integer.
    /// - Duplicate check compares the normalized year.
    /// - Returns the stored record.
    ///
    /// # Errors
    /// - `Validation` for empty fields or an invalid year.
    /// - `DuplicateBook` when the triple is already present.
    pub fn add(
        &mut self,
        title: &str,
        author: &str,
        year: &str,
        is_complete: bool,
    ) -> CollectionResult<Book> {
        let draft = BookDraft::parse(title, author, year)?;

        if let Some(existing) = self
            .books
            .iter()
            .find(|book| book.matches_triple(&draft.title, &draft.author, draft.year))
        {
            warn!(
                "event=book_duplicate_rejected module=collection status=rejected existing_id={}",
                existing.id
            );
            return Err(CollectionError::DuplicateBook {
                existing: existing.id,
            });
        }

        let book = Book::new(
            self.next_id(),
            draft.title,
            draft.author,
            draft.year,
            is_complete,
        );
        self.books.push(book.clone());
        info!(
            "event=book_added module=collection status=ok book_id={} size={}",
            book.id,
            self.books.len()
        );
        Ok(book)
    }

    /// Finds a book by id.
    pub fn find_by_id(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    /// Removes a book and returns it for confirmation messaging.
    pub fn remove(&mut self, id: BookId) -> CollectionResult<Book> {
        let index = self
            .books
            .iter()
            .position(|book| book.id == id)
            .ok_or(CollectionError::NotFound(id))?;
        let removed = self.books.remove(index);
        info!(
            "event=book_removed module=collection status=ok book_id={} size={}",
            id,
            self.books.len()
        );
        Ok(removed)
    }

    /// Sets the completion flag. Unknown ids are ignored.
    pub fn set_complete(&mut self, id: BookId, value: bool) {
        if let Some(book) = self.books.iter_mut().find(|book| book.id == id) {
            book.is_complete = value;
            info!(
                "event=book_status_changed module=collection status=ok book_id={} is_complete={}",
                id, value
            );
        }
    }

    /// Replaces title, author and year of an existing book in place.
    ///
    /// Does not re-check the duplicate triple against other books.
    pub fn update(
        &mut self,
        id: BookId,
        title: &str,
        author: &str,
        year: &str,
    ) -> CollectionResult<()> {
        let index = self
            .books
            .iter()
            .position(|book| book.id == id)
            .ok_or(CollectionError::NotFound(id))?;
        let draft = BookDraft::parse(title, author, year)?;

        let book = &mut self.books[index];
        book.title = draft.title;
        book.author = draft.author;
        book.year = draft.year;
        info!("event=book_updated module=collection status=ok book_id={id}");
        Ok(())
    }

    /// Empties the collection.
    pub fn clear(&mut self) {
        let removed = self.books.len();
        self.books.clear();
        info!("event=books_cleared module=collection status=ok removed={removed}");
    }

    /// Returns books whose title contains `query`, ignoring case.
    ///
    /// An empty query matches every book.
    pub fn search(&self, query: &str) -> Vec<Book> {
        let needle = query.to_lowercase();
        self.books
            .iter()
            .filter(|book| book.title.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    fn next_id(&self) -> BookId {
        let candidate = self.clock.now_millis();
        match self.books.iter().map(|book| book.id).max() {
            Some(max) if candidate <= max => max
                .checked_add(1)
                .unwrap_or_else(|| self.lowest_free_id()),
            _ => candidate,
        }
    }

    /// Smallest positive id not in use, for when ids above the max run out.
    fn lowest_free_id(&self) -> BookId {
        let taken: HashSet<BookId> = self.books.iter().map(|book| book.id).collect();
        (1..=BookId::MAX)
            .find(|id| !taken.contains(id))
            .unwrap_or(BookId::MIN)
    }
}
