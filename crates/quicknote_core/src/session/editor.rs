//! Editor session composition root.
//!
//! # Responsibility
//! - Own the repository, active selection, autosave scheduler and draft.
//! - Translate view intents into repository mutations.
//! - Re-render through `NoteView` after every state change.
//!
//! # Invariants
//! - Repository and selection are mutually consistent whenever control
//!   returns to the caller.
//! - A failed save leaves the draft staged and the autosave re-armed, so
//!   unsaved edits are never dropped silently.
//! - A failed save never blocks leaving the note: select, create and a
//!   confirmed delete still complete, and the lost write is reported.

use crate::clock::Clock;
use crate::model::id::IdGenerator;
use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::{DeleteOutcome, NoteRepository};
use crate::session::autosave::AutosaveScheduler;
use crate::session::config::SessionConfig;
use crate::session::selection::ActiveSelection;
use crate::store::{NoteStore, StoreError, StoreResult};
use log::{debug, info, warn};
use std::rc::Rc;

/// View-layer collaborator consumed by the session.
///
/// Render calls receive a full snapshot and must be idempotent.
pub trait NoteView {
    /// Called after any change to ordering or selection.
    fn render_list(&mut self, sorted_notes: &[&Note], active_id: Option<&str>);
    /// Called after selection or content changes. `None` disables the editor.
    fn render_editor(&mut self, active_note: Option<&Note>);
    /// Synchronous yes/no confirmation before destructive actions.
    fn confirm_destructive(&mut self, prompt: &str) -> bool;
}

/// Editable form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Title,
    Content,
}

/// Values staged in the editor but not necessarily saved yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorDraft {
    pub title: String,
    pub content: String,
}

impl EditorDraft {
    fn from_note(note: Option<&Note>) -> Self {
        note.map_or_else(Self::default, |note| Self {
            title: note.title().to_string(),
            content: note.content().to_string(),
        })
    }
}

/// Result of an intent that moves the editor off the active note.
///
/// `discarded_edits` carries the save error when staged edits of the
/// previous note could not be written and were dropped to let the move
/// complete.
#[derive(Debug)]
pub struct Navigation<T> {
    pub value: T,
    pub discarded_edits: Option<StoreError>,
}

impl<T> Navigation<T> {
    fn new(value: T, discarded_edits: Option<StoreError>) -> Self {
        Self {
            value,
            discarded_edits,
        }
    }
}

/// One independent editing session over one note store.
pub struct EditorSession<S: NoteStore, V: NoteView> {
    repo: NoteRepository<S>,
    selection: ActiveSelection,
    autosave: AutosaveScheduler,
    draft: EditorDraft,
    clock: Rc<dyn Clock>,
    view: V,
    config: SessionConfig,
}

impl<S: NoteStore, V: NoteView> EditorSession<S, V> {
    /// Loads the persisted collection, selects the newest note and renders.
    pub fn start(
        store: S,
        view: V,
        clock: Rc<dyn Clock>,
        ids: Box<dyn IdGenerator>,
        config: SessionConfig,
    ) -> Self {
        let mut repo = NoteRepository::new(store, Rc::clone(&clock), ids);
        repo.load_all();

        let mut selection = ActiveSelection::new();
        selection.select_newest(&repo.sorted_view());

        let mut session = Self {
            draft: EditorDraft::from_note(selection.current(&repo)),
            autosave: AutosaveScheduler::new(config.autosave_delay_ms),
            repo,
            selection,
            clock,
            view,
            config,
        };
        info!(
            "event=session_start module=session status=ok count={} has_active={}",
            session.repo.len(),
            session.selection.active_id().is_some()
        );
        session.render_all();
        session
    }

    /// Creates an empty note and makes it active.
    ///
    /// Pending edits of the previously active note are saved first. When
    /// that save fails the note is still created and the error is returned
    /// in `discarded_edits`. A failed create keeps the previous note active
    /// with its draft staged.
    pub fn on_create_note(&mut self) -> StoreResult<Navigation<NoteId>> {
        let flush_error = self.flush_before_leaving();
        let id = self.repo.create()?;
        self.discard_pending(&flush_error);
        self.selection.select(&self.repo, &id);
        self.draft = EditorDraft::default();
        info!(
            "event=note_create module=session status=ok count={}",
            self.repo.len()
        );
        self.render_all();
        Ok(Navigation::new(id, flush_error))
    }

    /// Binds `id` to the editor.
    ///
    /// `value` is `false` without any state change when `id` is unknown.
    /// Re-selecting the active note keeps the staged draft. Pending edits of
    /// the previous note are saved first; if that save fails the switch
    /// still happens and the error is returned in `discarded_edits`.
    pub fn on_select_note(&mut self, id: &str) -> Navigation<bool> {
        if !self.repo.contains(id) {
            debug!("event=note_select module=session status=not_found");
            return Navigation::new(false, None);
        }
        if self.selection.active_id() == Some(id) {
            return Navigation::new(true, None);
        }

        let flush_error = self.flush_before_leaving();
        self.discard_pending(&flush_error);
        self.selection.select(&self.repo, id);
        self.draft = EditorDraft::from_note(self.selection.current(&self.repo));
        self.render_all();
        Navigation::new(true, flush_error)
    }

    /// Stages a field value and restarts the autosave delay.
    ///
    /// Returns `false` and ignores the value while the editor is disabled.
    pub fn on_edit_field(&mut self, field: EditorField, value: impl Into<String>) -> bool {
        if !self.is_editor_enabled() {
            return false;
        }

        match field {
            EditorField::Title => self.draft.title = value.into(),
            EditorField::Content => self.draft.content = value.into(),
        }
        self.autosave.notify_edit(self.clock.now_ms());
        true
    }

    /// Saves the draft immediately, cancelling any pending autosave.
    ///
    /// Returns `Ok(false)` when no note is active.
    pub fn on_explicit_save(&mut self) -> StoreResult<bool> {
        self.autosave.flush_now();
        self.run_save()
    }

    /// Deletes the active note after user confirmation.
    ///
    /// Returns `Ok(false)` when no note is active or the user declines.
    /// A failed save of pending edits does not block the delete; those
    /// edits belong to the note being removed.
    pub fn on_delete_note(&mut self) -> StoreResult<bool> {
        let Some(id) = self.selection.active_id().map(str::to_string) else {
            return Ok(false);
        };
        if !self.view.confirm_destructive(&self.config.delete_prompt) {
            debug!("event=note_delete module=session status=declined");
            return Ok(false);
        }

        let flush_error = self.flush_before_leaving();
        if self.repo.delete(&id)? == DeleteOutcome::NotFound {
            return Ok(false);
        }
        self.discard_pending(&flush_error);

        self.selection
            .reconcile_after_deletion(&self.repo.sorted_view());
        self.draft = EditorDraft::from_note(self.selection.current(&self.repo));
        info!(
            "event=note_delete module=session status=ok count={}",
            self.repo.len()
        );
        self.render_all();
        Ok(true)
    }

    /// Timer entry point: saves when the autosave deadline has passed.
    ///
    /// Hosts call this when the deadline from `next_autosave_deadline`
    /// elapses; early calls are harmless no-ops.
    pub fn on_timer_tick(&mut self) -> StoreResult<bool> {
        if !self.autosave.fire_if_due(self.clock.now_ms()) {
            return Ok(false);
        }
        debug!("event=autosave_fire module=session status=start");
        self.run_save()
    }

    /// Epoch milliseconds at which the pending autosave is due.
    pub fn next_autosave_deadline(&self) -> Option<i64> {
        self.autosave.deadline()
    }

    pub fn active_note(&self) -> Option<&Note> {
        self.selection.current(&self.repo)
    }

    pub fn is_editor_enabled(&self) -> bool {
        self.selection.is_editor_enabled(&self.repo)
    }

    pub fn repository(&self) -> &NoteRepository<S> {
        &self.repo
    }

    pub fn selection(&self) -> &ActiveSelection {
        &self.selection
    }

    pub fn draft(&self) -> &EditorDraft {
        &self.draft
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Saves pending edits before the editor moves away from the active
    /// note. Returns the save error instead of propagating it.
    fn flush_before_leaving(&mut self) -> Option<StoreError> {
        if !self.autosave.flush_now() {
            return None;
        }
        self.run_save().err()
    }

    /// Drops the retry armed by a failed save once the move has happened.
    fn discard_pending(&mut self, flush_error: &Option<StoreError>) {
        if let Some(err) = flush_error {
            self.autosave.cancel();
            warn!(
                "event=draft_discard module=session status=error error={}",
                err
            );
        }
    }

    fn run_save(&mut self) -> StoreResult<bool> {
        match self.save_active() {
            Ok(saved) => Ok(saved),
            Err(err) => {
                let deadline = self.autosave.notify_edit(self.clock.now_ms());
                warn!(
                    "event=autosave module=session status=error retry_at={} error={}",
                    deadline, err
                );
                Err(err)
            }
        }
    }

    fn save_active(&mut self) -> StoreResult<bool> {
        let Some(id) = self.selection.active_id().map(str::to_string) else {
            return Ok(false);
        };

        let saved = self.repo.update(
            &id,
            self.draft.title.clone(),
            self.draft.content.clone(),
        )?;
        if saved {
            self.render_all();
        }
        Ok(saved)
    }

    fn render_all(&mut self) {
        let sorted = self.repo.sorted_view();
        self.view.render_list(&sorted, self.selection.active_id());
        self.view.render_editor(self.selection.current(&self.repo));
    }
}
