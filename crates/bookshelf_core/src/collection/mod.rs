//! Authoritative in-memory book collection.
//!
//! # Responsibility
//! - Own the ordered list of books and every mutation of it.
//! - Enforce identity and duplicate-triple invariants on insert.
//!
//! # Invariants
//! - Callers never mutate books except through `BookCollection`.
//! - The collection knows nothing about rendering or persistence.

pub mod book_collection;
