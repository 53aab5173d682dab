//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the editor session intents to Dart via FRB.
//! - Return full snapshots so the Dart side renders without extra queries.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One session per calling thread; Dart drives it from the UI isolate.
//! - Storage write failures are reported in the envelope, never thrown.

use log::warn;
use quicknote_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    EditorField, EditorSession, Navigation, Note, NoteView, SessionConfig, SqliteNoteStore,
    StoreResult, SystemClock, UuidIdGenerator,
};
use std::cell::RefCell;
use std::rc::Rc;

type FfiSession = EditorSession<SqliteNoteStore, SnapshotView>;

thread_local! {
    static SESSION: RefCell<Option<FfiSession>> = const { RefCell::new(None) };
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One row of the note list, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteListItem {
    pub id: String,
    pub title: String,
    /// Epoch milliseconds.
    pub updated_at: i64,
}

/// Saved state of the note bound to the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSnapshot {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Response envelope returned by every notes call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesSnapshot {
    /// Whether the requested operation succeeded.
    pub ok: bool,
    /// Human-readable diagnostics; empty on plain success.
    pub message: String,
    pub items: Vec<NoteListItem>,
    pub active_id: Option<String>,
    /// `None` means the editor is disabled.
    pub editor: Option<EditorSnapshot>,
    /// When set, Dart should call `notes_tick` at or after this instant.
    pub autosave_deadline_ms: Option<i64>,
}

impl NotesSnapshot {
    fn closed(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            items: Vec::new(),
            active_id: None,
            editor: None,
            autosave_deadline_ms: None,
        }
    }
}

/// Opens (or creates) the notes database at `db_path` and starts a session.
///
/// An already open session on this thread is flushed and replaced once the
/// new database has opened; a failed open leaves it untouched.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; failures come back as `ok=false` with a message.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_open(db_path: String) -> NotesSnapshot {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return NotesSnapshot::closed("notes_open failed: db_path cannot be empty");
    }

    let store = match SqliteNoteStore::open(trimmed) {
        Ok(store) => store,
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error operation=notes_open error={err}");
            return NotesSnapshot::closed(format!("notes_open failed: {err}"));
        }
    };
    let close_message = close_current_session();
    let session = EditorSession::start(
        store,
        SnapshotView::default(),
        Rc::new(SystemClock),
        Box::new(UuidIdGenerator),
        SessionConfig::default(),
    );

    SESSION.with(|cell| {
        let mut slot = cell.borrow_mut();
        let session = slot.insert(session);
        snapshot(session, true, close_message.unwrap_or_default())
    })
}

/// Flushes pending edits and drops the session on this thread.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_close() -> NotesSnapshot {
    match close_current_session() {
        Some(message) => NotesSnapshot::closed(message),
        None => NotesSnapshot {
            ok: true,
            ..NotesSnapshot::closed(String::new())
        },
    }
}

/// Returns the current state without mutating anything.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_snapshot() -> NotesSnapshot {
    with_session("notes_snapshot", |_| Ok(String::new()))
}

/// Creates an empty note and makes it active.
///
/// Unsaved edits of the previous note that could not be written are
/// reported in `message`; the call itself still succeeds.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_create() -> NotesSnapshot {
    with_session("notes_create", |session| {
        session
            .on_create_note()
            .map(|created| navigation_message(&created, String::new()))
    })
}

/// Binds `id` to the editor.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_select(id: String) -> NotesSnapshot {
    with_session("notes_select", |session| {
        let selected = session.on_select_note(id.as_str());
        let message = if selected.value {
            String::new()
        } else {
            "Note not found.".to_string()
        };
        Ok(navigation_message(&selected, message))
    })
}

/// Stages a new title and restarts the autosave delay.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_edit_title(value: String) -> NotesSnapshot {
    edit_field(EditorField::Title, value)
}

/// Stages new content and restarts the autosave delay.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_edit_content(value: String) -> NotesSnapshot {
    edit_field(EditorField::Content, value)
}

/// Saves the staged draft immediately.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_save() -> NotesSnapshot {
    with_session("notes_save", |session| {
        session.on_explicit_save().map(|_| String::new())
    })
}

/// Runs the autosave when its deadline has passed.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_tick() -> NotesSnapshot {
    with_session("notes_tick", |session| {
        session.on_timer_tick().map(|_| String::new())
    })
}

/// Deletes the active note.
///
/// Dart shows its own dialog; `confirmed` carries the user's answer.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_delete(confirmed: bool) -> NotesSnapshot {
    with_session("notes_delete", |session| {
        session.view_mut().confirm_next = confirmed;
        let deleted = session.on_delete_note();
        session.view_mut().confirm_next = false;
        deleted.map(|deleted| {
            if deleted || !confirmed {
                String::new()
            } else {
                "No active note.".to_string()
            }
        })
    })
}

/// View that records the latest render calls for snapshotting.
#[derive(Debug, Default)]
struct SnapshotView {
    items: Vec<NoteListItem>,
    active_id: Option<String>,
    editor: Option<EditorSnapshot>,
    confirm_next: bool,
}

impl NoteView for SnapshotView {
    fn render_list(&mut self, sorted_notes: &[&Note], active_id: Option<&str>) {
        self.items = sorted_notes
            .iter()
            .map(|note| NoteListItem {
                id: note.id().to_string(),
                title: note.title().to_string(),
                updated_at: note.updated_at(),
            })
            .collect();
        self.active_id = active_id.map(str::to_string);
    }

    fn render_editor(&mut self, active_note: Option<&Note>) {
        self.editor = active_note.map(|note| EditorSnapshot {
            id: note.id().to_string(),
            title: note.title().to_string(),
            content: note.content().to_string(),
            created_at: note.created_at(),
            updated_at: note.updated_at(),
        });
    }

    fn confirm_destructive(&mut self, _prompt: &str) -> bool {
        self.confirm_next
    }
}

fn edit_field(field: EditorField, value: String) -> NotesSnapshot {
    with_session("notes_edit", |session| {
        Ok(if session.on_edit_field(field, value) {
            String::new()
        } else {
            "Editor is disabled: no active note.".to_string()
        })
    })
}

fn navigation_message<T>(navigation: &Navigation<T>, message: String) -> String {
    match &navigation.discarded_edits {
        Some(err) => format!("unsaved edits to the previous note were discarded: {err}"),
        None => message,
    }
}

fn with_session(
    operation: &str,
    f: impl FnOnce(&mut FfiSession) -> StoreResult<String>,
) -> NotesSnapshot {
    SESSION.with(|cell| {
        let mut slot = cell.borrow_mut();
        let Some(session) = slot.as_mut() else {
            return NotesSnapshot::closed(format!(
                "{operation} failed: notes session is not open; call notes_open first"
            ));
        };

        match f(session) {
            Ok(message) => snapshot(session, true, message),
            Err(err) => {
                warn!("event=ffi_call module=ffi status=error operation={operation} error={err}");
                snapshot(session, false, format!("{operation} failed: {err}"))
            }
        }
    })
}

fn close_current_session() -> Option<String> {
    let mut session = SESSION.with(|cell| cell.borrow_mut().take())?;
    if session.next_autosave_deadline().is_none() {
        return None;
    }
    session
        .on_explicit_save()
        .err()
        .map(|err| format!("pending edits could not be saved on close: {err}"))
}

fn snapshot(session: &FfiSession, ok: bool, message: String) -> NotesSnapshot {
    let view = session.view();
    NotesSnapshot {
        ok,
        message,
        items: view.items.clone(),
        active_id: view.active_id.clone(),
        editor: view.editor.clone(),
        autosave_deadline_ms: session.next_autosave_deadline(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, notes_close, notes_create, notes_delete, notes_edit_title,
        notes_open, notes_save, notes_select, notes_snapshot, notes_tick, ping,
    };

    fn open_temp_session() -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir
            .path()
            .join("notes.sqlite3")
            .to_str()
            .expect("utf-8 temp path")
            .to_string();
        let opened = notes_open(path.clone());
        assert!(opened.ok, "{}", opened.message);
        (dir, path)
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn calls_before_open_report_closed_session() {
        let response = notes_snapshot();
        assert!(!response.ok);
        assert!(response.message.contains("notes_open"));
    }

    #[test]
    fn open_rejects_blank_path() {
        let response = notes_open("   ".to_string());
        assert!(!response.ok);
    }

    #[test]
    fn create_edit_and_save_round_trip_through_reopen() {
        let (_dir, path) = open_temp_session();

        let created = notes_create();
        assert!(created.ok, "{}", created.message);
        let id = created.active_id.clone().expect("new note is active");
        assert_eq!(created.items.len(), 1);

        let edited = notes_edit_title("Shopping".to_string());
        assert!(edited.autosave_deadline_ms.is_some());
        let saved = notes_save();
        assert!(saved.ok, "{}", saved.message);
        assert_eq!(saved.autosave_deadline_ms, None);
        assert_eq!(saved.items[0].title, "Shopping");

        let reopened = notes_open(path);
        assert!(reopened.ok, "{}", reopened.message);
        assert_eq!(reopened.active_id.as_deref(), Some(id.as_str()));
        let editor = reopened.editor.expect("editor enabled after reopen");
        assert_eq!(editor.title, "Shopping");
    }

    #[test]
    fn tick_before_deadline_does_not_save() {
        let (_dir, _path) = open_temp_session();
        notes_create();
        notes_edit_title("pending".to_string());

        let ticked = notes_tick();
        assert!(ticked.ok);
        assert!(ticked.autosave_deadline_ms.is_some());
        assert_eq!(ticked.items[0].title, "");
    }

    #[test]
    fn delete_requires_confirmation() {
        let (_dir, _path) = open_temp_session();
        notes_create();
        let second = notes_create();
        let newest = second.active_id.clone().unwrap();

        let declined = notes_delete(false);
        assert!(declined.ok);
        assert_eq!(declined.items.len(), 2);

        let deleted = notes_delete(true);
        assert!(deleted.ok, "{}", deleted.message);
        assert_eq!(deleted.items.len(), 1);
        assert_ne!(deleted.active_id.as_deref(), Some(newest.as_str()));
    }

    #[test]
    fn select_unknown_note_reports_message() {
        let (_dir, _path) = open_temp_session();
        notes_create();

        let response = notes_select("missing".to_string());
        assert!(response.ok);
        assert_eq!(response.message, "Note not found.");
    }

    #[test]
    fn failed_open_keeps_current_session() {
        let (dir, _path) = open_temp_session();
        notes_create();
        notes_edit_title("still here".to_string());

        let unreachable = dir
            .path()
            .join("missing")
            .join("notes.sqlite3")
            .to_str()
            .expect("utf-8 temp path")
            .to_string();
        let failed = notes_open(unreachable);
        assert!(!failed.ok);
        assert!(failed.message.starts_with("notes_open failed"));

        let current = notes_snapshot();
        assert!(current.ok, "{}", current.message);
        assert_eq!(current.items.len(), 1);
        assert!(current.autosave_deadline_ms.is_some());

        let saved = notes_save();
        assert_eq!(saved.items[0].title, "still here");
    }

    #[test]
    fn close_flushes_pending_edits() {
        let (_dir, path) = open_temp_session();
        notes_create();
        notes_edit_title("kept on close".to_string());

        let closed = notes_close();
        assert!(closed.ok, "{}", closed.message);
        assert!(!notes_snapshot().ok);

        let reopened = notes_open(path);
        assert_eq!(reopened.items[0].title, "kept on close");
    }
}
