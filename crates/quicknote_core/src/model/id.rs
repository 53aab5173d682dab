//! Note identity generation.
//!
//! # Responsibility
//! - Provide the injectable `IdGenerator` contract used by note creation.
//! - Ship a random production generator and a deterministic one.
//!
//! # Invariants
//! - Generated ids are unique within one process lifetime.

use crate::model::note::NoteId;
use uuid::Uuid;

/// Source of fresh note ids.
pub trait IdGenerator {
    fn generate_id(&mut self) -> NoteId;
}

/// Random v4 UUID ids in hyphenated lowercase form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn generate_id(&mut self) -> NoteId {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic ids `<prefix>1`, `<prefix>2`, ...
///
/// Used by tests and by hosts that need reproducible fixtures.
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: u64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new("n")
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate_id(&mut self) -> NoteId {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
