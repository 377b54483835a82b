//! Shelf projections handed to the rendering collaborator.
//!
//! # Responsibility
//! - Split a book list into unfinished and finished shelves.
//! - Compute summary counts.
//!
//! # Invariants
//! - Projections own no state and never mutate the collection.
//! - Counts are computed from the full collection, even during a search.

pub mod shelf_view;
