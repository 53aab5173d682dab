//! Core note state manager for QuickNote.
//! This crate is the single source of truth for note invariants, storage
//! synchronization and the autosave policy.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod session;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::id::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use model::note::{Note, NoteId};
pub use repo::note_repo::{DeleteOutcome, NoteRepository};
pub use session::autosave::{AutosaveScheduler, AutosaveState, AUTOSAVE_DELAY_MS};
pub use session::config::{SessionConfig, DEFAULT_DELETE_PROMPT};
pub use session::editor::{EditorDraft, EditorField, EditorSession, Navigation, NoteView};
pub use session::selection::ActiveSelection;
pub use store::{
    MemoryNoteStore, NoteStore, SqliteNoteStore, StoreError, StoreResult, NOTES_STORAGE_KEY,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
