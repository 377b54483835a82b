//! Shelf view model and renderer contract.

use crate::model::book::{Book, BookId};

/// Per-item action offered by a rendered book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookAction {
    /// Move an unfinished book to the finished shelf.
    Complete,
    /// Move a finished book back to the unfinished shelf.
    Undo,
    Edit,
    Delete,
}

impl BookAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Undo => "undo",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }
}

/// One rendered book entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookItemView {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub actions: Vec<BookAction>,
}

impl BookItemView {
    fn from_book(book: &Book) -> Self {
        let actions = if book.is_complete {
            vec![BookAction::Undo, BookAction::Delete]
        } else {
            vec![BookAction::Edit, BookAction::Complete, BookAction::Delete]
        };
        Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.year,
            actions,
        }
    }
}

/// Both shelves, in the order the input list presented the books.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShelfView {
    pub incomplete: Vec<BookItemView>,
    pub complete: Vec<BookItemView>,
}

impl ShelfView {
    /// Routes each book to a shelf by its completion flag.
    ///
    /// Accepts the full collection or any filtered subset of it.
    pub fn project(books: &[Book]) -> Self {
        let mut view = Self::default();
        for book in books {
            let item = BookItemView::from_book(book);
            if book.is_complete {
                view.complete.push(item);
            } else {
                view.incomplete.push(item);
            }
        }
        view
    }

    pub fn len(&self) -> usize {
        self.incomplete.len() + self.complete.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Summary counts shown next to the shelves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShelfCounts {
    pub total: usize,
    pub incomplete: usize,
    pub complete: usize,
}

impl ShelfCounts {
    pub fn from_books(books: &[Book]) -> Self {
        let complete = books.iter().filter(|book| book.is_complete).count();
        Self {
            total: books.len(),
            incomplete: books.len() - complete,
            complete,
        }
    }
}

/// Rendering collaborator driven by the controller.
///
/// Each call replaces whatever was drawn before.
pub trait ShelfRenderer {
    fn render(&mut self, view: &ShelfView);
    fn render_counts(&mut self, counts: ShelfCounts);
}
