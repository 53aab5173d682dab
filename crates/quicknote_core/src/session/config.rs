//! Editor session settings.

use crate::session::autosave::AUTOSAVE_DELAY_MS;

/// Prompt passed to `NoteView::confirm_destructive` before deleting.
pub const DEFAULT_DELETE_PROMPT: &str = "Delete this note? This cannot be undone.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Idle period before staged edits are saved.
    pub autosave_delay_ms: i64,
    pub delete_prompt: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            autosave_delay_ms: AUTOSAVE_DELAY_MS,
            delete_prompt: DEFAULT_DELETE_PROMPT.to_string(),
        }
    }
}
