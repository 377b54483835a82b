//! Bookshelf controller and form state machine.
//!
//! # Responsibility
//! - Own the collection, the snapshot adapter and both UI collaborators.
//! - Hold form input between submissions, in Create or Edit mode.
//!
//! # Invariants
//! - Exactly one submit path exists; the mode decides add versus update.
//! - Entering Edit binds the target id fresh, replacing any previous target.
//! - Search never mutates or persists.

use super::notice::{Notice, Notifier, CLEAR_ALL_PROMPT};
use crate::collection::book_collection::{BookCollection, CollectionError, IdClock, SystemClock};
use crate::model::book::{Book, BookId, BookValidationError};
use crate::storage::book_storage::BookStorage;
use crate::view::shelf_view::{ShelfCounts, ShelfRenderer, ShelfView};
use log::{debug, warn};

/// Raw form fields, kept as text until submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub year: String,
    /// Only read in Create mode.
    pub is_complete: bool,
}

impl BookForm {
    fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.year.to_string(),
            is_complete: book.is_complete,
        }
    }
}

/// Form state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit {
        book_id: BookId,
    },
}

/// Result of a form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Added(Book),
    Updated(Book),
    /// Input rejected; mode and form are unchanged.
    Invalid(BookValidationError),
    /// Triple already present; form retained in Create mode.
    Duplicate { existing: BookId },
    /// Edit target disappeared; the form returned to Create.
    Discarded,
}

/// Interaction controller for one bookshelf session.
pub struct ShelfController<V, N, C = SystemClock>
where
    V: ShelfRenderer,
    N: Notifier,
    C: IdClock,
{
    collection: BookCollection<C>,
    storage: BookStorage,
    renderer: V,
    notifier: N,
    form: BookForm,
    mode: FormMode,
    storage_notice_shown: bool,
}

impl<V: ShelfRenderer, N: Notifier> ShelfController<V, N, SystemClock> {
    pub fn new(storage: BookStorage, renderer: V, notifier: N) -> Self {
        Self::with_collection(BookCollection::new(), storage, renderer, notifier)
    }
}

impl<V, N, C> ShelfController<V, N, C>
where
    V: ShelfRenderer,
    N: Notifier,
    C: IdClock,
{
    /// Builds a controller around an existing (usually empty) collection.
    pub fn with_collection(
        collection: BookCollection<C>,
        storage: BookStorage,
        renderer: V,
        notifier: N,
    ) -> Self {
        Self {
            collection,
            storage,
            renderer,
            notifier,
            form: BookForm::default(),
            mode: FormMode::Create,
            storage_notice_shown: false,
        }
    }

    /// Loads the stored snapshot and draws the initial shelves.
    ///
    /// A missing store is reported once and the session runs memory-only.
    /// Undecodable records are reported and dropped; the rest load. A slot
    /// that is not a list at all is reported and left untouched until the
    /// next mutation overwrites it.
    pub fn start(&mut self) {
        if !self.storage.is_available() {
            warn!("event=storage_unavailable module=controller status=memory_only");
            if !self.storage_notice_shown {
                self.storage_notice_shown = true;
                self.notifier.notify(&Notice::StorageUnavailable);
            }
        } else {
            match self.storage.load_snapshot() {
                Ok(snapshot) => {
                    if snapshot.skipped > 0 {
                        self.notifier.notify(&Notice::RecordsSkipped {
                            count: snapshot.skipped,
                        });
                    }
                    self.collection.replace_all(snapshot.books);
                }
                Err(err) => {
                    warn!(
                        "event=snapshot_loaded module=controller status=error error_code=load_failed error={err}"
                    );
                    self.notifier.notify(&Notice::SnapshotUnreadable);
                }
            }
        }

        self.render_all();
        self.render_counts();
    }

    pub fn collection(&self) -> &BookCollection<C> {
        &self.collection
    }

    pub fn renderer(&self) -> &V {
        &self.renderer
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Lets the host reuse its notifier for input it owns, such as a console.
    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn storage(&self) -> &BookStorage {
        &self.storage
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn form(&self) -> &BookForm {
        &self.form
    }

    /// Mutable access for the host to write user input into the form.
    pub fn form_mut(&mut self) -> &mut BookForm {
        &mut self.form
    }

    /// Submits the form through the single submit path.
    pub fn submit(&mut self) -> FormOutcome {
        match self.mode {
            FormMode::Create => self.submit_create(),
            FormMode::Edit { book_id } => self.submit_update(book_id),
        }
    }

    fn submit_create(&mut self) -> FormOutcome {
        let BookForm {
            title,
            author,
            year,
            is_complete,
        } = self.form.clone();

        match self.collection.add(&title, &author, &year, is_complete) {
            Ok(book) => {
                self.commit();
                self.notifier.notify(&Notice::Added {
                    title: book.title.clone(),
                });
                self.form = BookForm::default();
                FormOutcome::Added(book)
            }
            Err(CollectionError::DuplicateBook { existing }) => {
                self.notifier.notify(&Notice::DuplicateBook);
                FormOutcome::Duplicate { existing }
            }
            Err(CollectionError::Validation(err)) => self.reject(err),
            // `add` never reports a missing id.
            Err(CollectionError::NotFound(_)) => FormOutcome::Discarded,
        }
    }

    fn submit_update(&mut self, book_id: BookId) -> FormOutcome {
        let BookForm {
            title,
            author,
            year,
            ..
        } = self.form.clone();

        match self.collection.update(book_id, &title, &author, &year) {
            Ok(()) => {
                let Some(book) = self.collection.find_by_id(book_id).cloned() else {
                    return self.discard_edit();
                };
                self.commit();
                self.notifier.notify(&Notice::Updated {
                    title: book.title.clone(),
                });
                self.form = BookForm::default();
                self.mode = FormMode::Create;
                FormOutcome::Updated(book)
            }
            Err(CollectionError::Validation(err)) => self.reject(err),
            Err(CollectionError::NotFound(_)) | Err(CollectionError::DuplicateBook { .. }) => {
                self.discard_edit()
            }
        }
    }

    fn reject(&mut self, err: BookValidationError) -> FormOutcome {
        let notice = match &err {
            BookValidationError::MissingField(field) => Notice::MissingField(*field),
            BookValidationError::InvalidYear(value) => Notice::InvalidYear(value.clone()),
        };
        self.notifier.notify(&notice);
        FormOutcome::Invalid(err)
    }

    fn discard_edit(&mut self) -> FormOutcome {
        debug!("event=edit_discarded module=controller status=not_found");
        self.form = BookForm::default();
        self.mode = FormMode::Create;
        FormOutcome::Discarded
    }

    /// Enters Edit mode for `book_id`, filling the form from the book.
    ///
    /// Returns `false` and leaves the state alone when the id is unknown.
    pub fn begin_edit(&mut self, book_id: BookId) -> bool {
        let Some(book) = self.collection.find_by_id(book_id) else {
            return false;
        };
        self.form = BookForm::from_book(book);
        self.mode = FormMode::Edit { book_id };
        true
    }

    /// Leaves Edit mode and clears the form.
    pub fn cancel_edit(&mut self) {
        self.form = BookForm::default();
        self.mode = FormMode::Create;
    }

    /// Marks a book finished. Unknown ids are ignored.
    pub fn complete(&mut self, book_id: BookId) {
        self.change_status(book_id, true);
    }

    /// Moves a finished book back to unfinished. Unknown ids are ignored.
    pub fn undo(&mut self, book_id: BookId) {
        self.change_status(book_id, false);
    }

    fn change_status(&mut self, book_id: BookId, value: bool) {
        if self.collection.find_by_id(book_id).is_none() {
            return;
        }
        self.collection.set_complete(book_id, value);
        self.commit();
    }

    /// Deletes a book. Unknown ids are ignored.
    pub fn delete(&mut self, book_id: BookId) -> Option<Book> {
        let removed = self.collection.remove(book_id).ok()?;
        self.commit();
        self.notifier.notify(&Notice::Removed {
            title: removed.title.clone(),
        });
        Some(removed)
    }

    /// Clears every book after confirmation. Returns whether it cleared.
    pub fn clear_all(&mut self) -> bool {
        if !self.notifier.confirm(CLEAR_ALL_PROMPT) {
            return false;
        }
        self.collection.clear();
        self.commit();
        self.notifier.notify(&Notice::Cleared);
        true
    }

    /// Renders the books whose title matches `query`.
    ///
    /// Counts are left as they are, so they keep describing the full shelf.
    pub fn search(&mut self, query: &str) -> Vec<Book> {
        let hits = self.collection.search(query.trim());
        self.renderer.render(&ShelfView::project(&hits));
        hits
    }

    /// Redraws the full collection.
    pub fn refresh(&mut self) {
        self.render_all();
        self.render_counts();
    }

    fn commit(&mut self) {
        self.render_all();
        self.storage.save(self.collection.books());
        self.render_counts();
    }

    fn render_all(&mut self) {
        self.renderer
            .render(&ShelfView::project(self.collection.books()));
    }

    fn render_counts(&mut self) {
        self.renderer
            .render_counts(ShelfCounts::from_books(self.collection.books()));
    }
}
