//! User-facing notices and the notification collaborator.

use crate::model::book::BookField;
use std::fmt::{Display, Formatter};

/// Question asked before clearing every book.
pub const CLEAR_ALL_PROMPT: &str = "Are you sure you want to delete all books?";

/// Message shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Added { title: String },
    Updated { title: String },
    Removed { title: String },
    Cleared,
    MissingField(BookField),
    InvalidYear(String),
    DuplicateBook,
    /// Shown once per session when no durable store exists.
    StorageUnavailable,
    /// The stored snapshot could not be decoded; the session starts empty.
    SnapshotUnreadable,
    /// Some stored records could not be decoded and were left out.
    RecordsSkipped { count: usize },
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added { title } => write!(f, "Book \"{title}\" was added."),
            Self::Updated { title } => write!(f, "Book \"{title}\" was updated."),
            Self::Removed { title } => write!(f, "Book \"{title}\" was removed."),
            Self::Cleared => write!(f, "All books were removed."),
            Self::MissingField(field) => {
                write!(f, "Please fill in every book field ({} is empty).", field.as_str())
            }
            Self::InvalidYear(value) => write!(f, "Year \"{value}\" is not valid."),
            Self::DuplicateBook => write!(f, "This book is already on the shelf."),
            Self::StorageUnavailable => write!(
                f,
                "Durable storage is not available; changes will be lost when you exit."
            ),
            Self::SnapshotUnreadable => write!(
                f,
                "Saved books could not be read; starting with an empty shelf."
            ),
            Self::RecordsSkipped { count } => {
                write!(f, "{count} saved book(s) could not be read and were left out.")
            }
        }
    }
}

/// Alert/confirmation collaborator.
pub trait Notifier {
    fn notify(&mut self, notice: &Notice);
    fn confirm(&mut self, prompt: &str) -> bool;
}
