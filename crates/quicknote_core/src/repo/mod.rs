//! Repository layer over the note store.
//!
//! # Responsibility
//! - Own the in-memory note collection and its load/save orchestration.
//! - Keep persistence details behind the `NoteStore` contract.
//!
//! # Invariants
//! - In-memory state equals the last successfully persisted collection
//!   once any repository call returns.
//! - Missing ids are reported through return values, never as errors.

pub mod note_repo;
