//! Domain model for the note collection.
//!
//! # Responsibility
//! - Define the single persisted entity (`Note`) and its wire shape.
//! - Turn raw persisted records into notes through sanitization.
//! - Provide identity generation behind an injectable trait.
//!
//! # Invariants
//! - `id` and `created_at` never change after a note is constructed.
//! - Fields are only mutated through crate-internal repository paths.

pub mod id;
pub mod note;
