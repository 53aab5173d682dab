//! Active note selection.

use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::NoteRepository;
use crate::store::NoteStore;

/// Tracks which note, if any, is bound to the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveSelection {
    active_id: Option<NoteId>,
}

impl ActiveSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `id` when the repository holds it.
    ///
    /// Returns `false` and leaves the selection untouched otherwise.
    pub fn select<S: NoteStore>(&mut self, repo: &NoteRepository<S>, id: &str) -> bool {
        if !repo.contains(id) {
            return false;
        }
        self.active_id = Some(id.to_string());
        true
    }

    pub fn clear(&mut self) {
        self.active_id = None;
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// Resolves the active note; `None` means "no selection".
    pub fn current<'r, S: NoteStore>(&self, repo: &'r NoteRepository<S>) -> Option<&'r Note> {
        self.active_id.as_deref().and_then(|id| repo.get(id))
    }

    pub fn is_editor_enabled<S: NoteStore>(&self, repo: &NoteRepository<S>) -> bool {
        self.current(repo).is_some()
    }

    /// Binds the head of a newest-first view, or clears when it is empty.
    ///
    /// Used at session start-up.
    pub fn select_newest(&mut self, sorted_view: &[&Note]) {
        self.active_id = sorted_view.first().map(|note| note.id().to_string());
    }

    /// Rebinds to the newest surviving note, or clears when none remain.
    pub fn reconcile_after_deletion(&mut self, sorted_view: &[&Note]) {
        self.select_newest(sorted_view);
    }
}

#[cfg(test)]
mod tests {
    use super::ActiveSelection;
    use crate::clock::ManualClock;
    use crate::model::id::SequentialIdGenerator;
    use crate::model::note::Note;
    use crate::repo::note_repo::NoteRepository;
    use crate::store::MemoryNoteStore;
    use std::rc::Rc;

    fn repo_with_one_note() -> NoteRepository<MemoryNoteStore> {
        let mut repo = NoteRepository::new(
            MemoryNoteStore::new(),
            Rc::new(ManualClock::new(1_000)),
            Box::new(SequentialIdGenerator::default()),
        );
        repo.create().unwrap();
        repo
    }

    #[test]
    fn select_unknown_id_keeps_previous_selection() {
        let repo = repo_with_one_note();
        let mut selection = ActiveSelection::new();
        assert!(selection.select(&repo, "n1"));

        assert!(!selection.select(&repo, "missing"));
        assert_eq!(selection.active_id(), Some("n1"));
        assert!(selection.is_editor_enabled(&repo));
    }

    #[test]
    fn current_is_none_when_cleared() {
        let repo = repo_with_one_note();
        let mut selection = ActiveSelection::new();
        selection.select(&repo, "n1");
        selection.clear();

        assert!(selection.current(&repo).is_none());
        assert!(!selection.is_editor_enabled(&repo));
    }

    #[test]
    fn reconcile_picks_head_of_view_or_clears() {
        let newest = Note::new("b", 20);
        let older = Note::new("a", 10);
        let mut selection = ActiveSelection::new();

        selection.reconcile_after_deletion(&[&newest, &older]);
        assert_eq!(selection.active_id(), Some("b"));

        selection.reconcile_after_deletion(&[]);
        assert_eq!(selection.active_id(), None);
    }

    #[test]
    fn select_newest_replaces_any_previous_selection() {
        let repo = repo_with_one_note();
        let mut selection = ActiveSelection::new();
        selection.select(&repo, "n1");

        let newest = Note::new("c", 30);
        selection.select_newest(&[&newest]);
        assert_eq!(selection.active_id(), Some("c"));

        selection.select_newest(&[]);
        assert!(selection.current(&repo).is_none());
    }
}
