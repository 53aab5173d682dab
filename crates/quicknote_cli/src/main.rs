//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `quicknote_core` linkage without any UI runtime.
//! - Optionally open a notes database and print its list, newest first.
//!
//! Usage: `quicknote_cli [DB_PATH]`

use quicknote_core::{
    EditorSession, Note, NoteView, SessionConfig, SqliteNoteStore, SystemClock, UuidIdGenerator,
};
use std::process::ExitCode;
use std::rc::Rc;

/// Prints the list render to stdout; never confirms destructive actions.
struct ConsoleView;

impl NoteView for ConsoleView {
    fn render_list(&mut self, sorted_notes: &[&Note], active_id: Option<&str>) {
        println!("notes count={}", sorted_notes.len());
        for note in sorted_notes {
            let marker = if Some(note.id()) == active_id { '*' } else { ' ' };
            let title = if note.title().is_empty() {
                "(untitled)"
            } else {
                note.title()
            };
            println!("{marker} {} updated_at={} {title}", note.id(), note.updated_at());
        }
    }

    fn render_editor(&mut self, _active_note: Option<&Note>) {}

    fn confirm_destructive(&mut self, _prompt: &str) -> bool {
        false
    }
}

fn main() -> ExitCode {
    println!("quicknote_core ping={}", quicknote_core::ping());
    println!("quicknote_core version={}", quicknote_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    let store = match SqliteNoteStore::open(&db_path) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("failed to open `{db_path}`: {err}");
            return ExitCode::FAILURE;
        }
    };
    let _session = EditorSession::start(
        store,
        ConsoleView,
        Rc::new(SystemClock),
        Box::new(UuidIdGenerator),
        SessionConfig::default(),
    );
    ExitCode::SUCCESS
}
