//! Bookshelf domain model.
//!
//! # Responsibility
//! - Define the canonical book record shared by collection, storage and view.
//! - Own year normalization so every write path agrees on one rule.
//!
//! # Invariants
//! - Every book is identified by a stable `BookId`.
//! - `year` is a real calendar year once a book is at rest.

pub mod book;
