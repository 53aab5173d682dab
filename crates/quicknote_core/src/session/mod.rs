//! Editor session: active selection, debounced autosave and the view-facing
//! composition root.
//!
//! # Responsibility
//! - Bind at most one note to the editor and keep that binding valid.
//! - Coalesce bursts of edits into one save per idle period.
//! - Route view intents to the repository and re-render after mutations.
//!
//! # Invariants
//! - The active id, when set, references a note in the repository.
//! - At most one autosave deadline is outstanding.

pub mod autosave;
pub mod config;
pub mod editor;
pub mod selection;
