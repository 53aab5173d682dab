//! Note repository: in-memory collection plus persistence orchestration.
//!
//! # Responsibility
//! - Load and sanitize the persisted collection.
//! - Create, update and delete notes, persisting the full collection after
//!   every mutation.
//! - Provide the `updated_at DESC` projection consumed by views.
//!
//! # Invariants
//! - Internally created ids are never duplicated; duplicates can only come
//!   from a corrupted persisted blob and are kept as loaded.
//! - A failed write rolls the in-memory mutation back before returning.

use crate::clock::Clock;
use crate::model::id::IdGenerator;
use crate::model::note::{Note, NoteId};
use crate::store::{NoteStore, StoreResult};
use log::{debug, info, warn};
use std::rc::Rc;

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// No note carried the requested id; nothing was written.
    NotFound,
    /// The note was removed and the collection persisted.
    Deleted { now_empty: bool },
}

/// In-memory note collection bound to one store.
pub struct NoteRepository<S: NoteStore> {
    store: S,
    clock: Rc<dyn Clock>,
    ids: Box<dyn IdGenerator>,
    /// Insertion order; most recently created first.
    notes: Vec<Note>,
}

impl<S: NoteStore> NoteRepository<S> {
    /// Creates an empty repository. Call `load_all` to read persisted notes.
    pub fn new(store: S, clock: Rc<dyn Clock>, ids: Box<dyn IdGenerator>) -> Self {
        Self {
            store,
            clock,
            ids,
            notes: Vec::new(),
        }
    }

    /// Replaces the in-memory collection with sanitized persisted records.
    ///
    /// Records without a string `id` are dropped; other malformed fields are
    /// defaulted (see `Note::from_raw`). Duplicate ids are kept.
    pub fn load_all(&mut self) -> &[Note] {
        let now_ms = self.clock.now_ms();
        let raw_records = self.store.load();
        let raw_count = raw_records.len();

        self.notes = raw_records
            .iter()
            .filter_map(|raw| Note::from_raw(raw, now_ms))
            .collect();

        let dropped = raw_count - self.notes.len();
        if dropped > 0 {
            warn!(
                "event=notes_load module=repo status=degraded count={} dropped={}",
                self.notes.len(),
                dropped
            );
        } else {
            info!(
                "event=notes_load module=repo status=ok count={}",
                self.notes.len()
            );
        }
        &self.notes
    }

    /// Creates an empty note at the head of the collection and persists it.
    ///
    /// Returns the new note id.
    pub fn create(&mut self) -> StoreResult<NoteId> {
        let id = self.ids.generate_id();
        let note = Note::new(id.clone(), self.clock.now_ms());
        self.notes.insert(0, note);

        if let Err(err) = self.store.save(&self.notes) {
            self.notes.remove(0);
            return Err(err);
        }

        debug!(
            "event=note_create module=repo status=ok count={}",
            self.notes.len()
        );
        Ok(id)
    }

    /// Replaces title and content of `id`, stamps `updated_at`, persists.
    ///
    /// Returns `Ok(false)` without writing when `id` is absent.
    pub fn update(&mut self, id: &str, title: String, content: String) -> StoreResult<bool> {
        let now_ms = self.clock.now_ms();
        let Some(index) = self.position(id) else {
            debug!("event=note_update module=repo status=not_found");
            return Ok(false);
        };

        let previous = self.notes[index].clone();
        self.notes[index].apply_edit(title, content, now_ms);

        if let Err(err) = self.store.save(&self.notes) {
            self.notes[index] = previous;
            return Err(err);
        }

        debug!("event=note_update module=repo status=ok updated_at={now_ms}");
        Ok(true)
    }

    /// Removes every note carrying `id` and persists the collection.
    pub fn delete(&mut self, id: &str) -> StoreResult<DeleteOutcome> {
        if !self.contains(id) {
            debug!("event=note_delete module=repo status=not_found");
            return Ok(DeleteOutcome::NotFound);
        }

        let previous = self.notes.clone();
        self.notes.retain(|note| note.id() != id);

        if let Err(err) = self.store.save(&self.notes) {
            self.notes = previous;
            return Err(err);
        }

        debug!(
            "event=note_delete module=repo status=ok count={}",
            self.notes.len()
        );
        Ok(DeleteOutcome::Deleted {
            now_empty: self.notes.is_empty(),
        })
    }

    /// Returns the collection ordered by `updated_at` descending.
    ///
    /// Equal timestamps keep insertion order.
    pub fn sorted_view(&self) -> Vec<&Note> {
        let mut view = self.notes.iter().collect::<Vec<_>>();
        view.sort_by(|left, right| right.updated_at().cmp(&left.updated_at()));
        view
    }

    /// Gets the first note carrying `id`.
    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.notes.iter().position(|note| note.id() == id)
    }
}
