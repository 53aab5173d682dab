//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record and its persisted JSON field names.
//! - Sanitize raw loaded records into the note shape.
//!
//! # Invariants
//! - `id` is set once at construction and never reassigned.
//! - `created_at` is set once at construction and never reassigned.
//! - `updated_at` changes only through repository saves.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque note identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteId = String;

/// Canonical note record.
///
/// Serialized with camelCase field names to match the persisted layout:
/// `id`, `title`, `content`, `createdAt`, `updatedAt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    id: NoteId,
    title: String,
    content: String,
    /// Unix epoch milliseconds.
    created_at: i64,
    /// Unix epoch milliseconds. Restamped on every successful save.
    updated_at: i64,
}

impl Note {
    /// Creates an empty note with both timestamps equal to `now_ms`.
    pub fn new(id: impl Into<NoteId>, now_ms: i64) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            content: String::new(),
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    /// Builds a note from a raw persisted record.
    ///
    /// Rules:
    /// - Records that are not objects, or lack a string `id`, are rejected.
    /// - `title`/`content` fall back to `""` when not strings.
    /// - `createdAt`/`updatedAt` fall back to `now_ms` when not numbers.
    /// - Unknown fields are ignored.
    pub fn from_raw(raw: &Value, now_ms: i64) -> Option<Self> {
        let record = raw.as_object()?;
        let id = record.get("id")?.as_str()?;

        Some(Self {
            id: id.to_string(),
            title: string_field(record, "title"),
            content: string_field(record, "content"),
            created_at: timestamp_field(record, "createdAt").unwrap_or(now_ms),
            updated_at: timestamp_field(record, "updatedAt").unwrap_or(now_ms),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn updated_at(&self) -> i64 {
        self.updated_at
    }

    /// Replaces editable fields and stamps `updated_at`.
    pub(crate) fn apply_edit(&mut self, title: String, content: String, now_ms: i64) {
        self.title = title;
        self.content = content;
        self.updated_at = now_ms;
    }
}

fn string_field(record: &Map<String, Value>, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn timestamp_field(record: &Map<String, Value>, key: &str) -> Option<i64> {
    let value = record.get(key)?;
    if let Some(millis) = value.as_i64() {
        return Some(millis);
    }
    // Epoch millis above i64::MAX or fractional values still count as numbers.
    value
        .as_f64()
        .filter(|millis| millis.is_finite())
        .map(|millis| millis as i64)
}

#[cfg(test)]
mod tests {
    use super::Note;
    use serde_json::json;

    #[test]
    fn new_note_is_empty_with_equal_timestamps() {
        let note = Note::new("n1", 1_000);
        assert_eq!(note.id(), "n1");
        assert_eq!(note.title(), "");
        assert_eq!(note.content(), "");
        assert_eq!(note.created_at(), 1_000);
        assert_eq!(note.updated_at(), 1_000);
    }

    #[test]
    fn from_raw_rejects_missing_or_non_string_id() {
        assert!(Note::from_raw(&json!({ "title": "no id" }), 5).is_none());
        assert!(Note::from_raw(&json!({ "id": 7 }), 5).is_none());
        assert!(Note::from_raw(&json!("n1"), 5).is_none());
        assert!(Note::from_raw(&json!(null), 5).is_none());
    }

    #[test]
    fn from_raw_defaults_malformed_fields() {
        let raw = json!({
            "id": "x",
            "title": 42,
            "content": null,
            "createdAt": "yesterday",
            "updatedAt": 12.9,
            "pinned": true
        });

        let note = Note::from_raw(&raw, 500).expect("record with string id is kept");
        assert_eq!(note.id(), "x");
        assert_eq!(note.title(), "");
        assert_eq!(note.content(), "");
        assert_eq!(note.created_at(), 500);
        assert_eq!(note.updated_at(), 12);
    }

    #[test]
    fn serialization_uses_camel_case_wire_fields() {
        let mut note = Note::new("n1", 1_000);
        note.apply_edit("Hello".to_string(), "Body".to_string(), 1_010);

        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(
            json,
            json!({
                "id": "n1",
                "title": "Hello",
                "content": "Body",
                "createdAt": 1_000,
                "updatedAt": 1_010
            })
        );
    }
}
