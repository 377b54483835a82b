//! Form and interaction controller.
//!
//! # Responsibility
//! - Translate user actions into collection calls.
//! - Drive the renderer and the snapshot adapter after every mutation.
//! - Run the create/edit form state machine.
//!
//! # Invariants
//! - The controller is the only mutation path into the collection.
//! - Per action order is fixed: mutate, render, persist, recount.
//! - No user-facing error stops the session.

pub mod notice;
pub mod shelf_controller;
