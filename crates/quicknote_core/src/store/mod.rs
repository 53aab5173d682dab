//! Persistent store adapters for the note collection.
//!
//! # Responsibility
//! - Read and write the whole note collection as one JSON blob.
//! - Keep the storage medium behind the `NoteStore` contract.
//!
//! # Invariants
//! - `load` never fails: unreadable state is logged and treated as empty.
//! - `save` overwrites the full blob in one write; last writer wins.

use crate::db::DbError;
use crate::model::note::Note;
use log::warn;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory_store;
pub mod sqlite_store;

pub use memory_store::MemoryNoteStore;
pub use sqlite_store::{SqliteNoteStore, NOTES_STORAGE_KEY};

pub type StoreResult<T> = Result<T, StoreError>;

/// Write-side failure of a store adapter.
///
/// Read-side failures never surface; see `NoteStore::load`.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Serialize(serde_json::Error),
    /// Serialized collection does not fit the configured quota.
    QuotaExceeded {
        required_bytes: usize,
        quota_bytes: usize,
    },
    MissingRequiredTable(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize notes: {err}"),
            Self::QuotaExceeded {
                required_bytes,
                quota_bytes,
            } => write!(
                f,
                "storage quota exceeded: {required_bytes} bytes required, {quota_bytes} allowed"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::QuotaExceeded { .. } | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Storage contract for the serialized note collection.
pub trait NoteStore {
    /// Returns raw persisted records, or an empty sequence when the blob is
    /// missing, malformed, or not a JSON array.
    fn load(&self) -> Vec<Value>;
    /// Serializes `notes` and overwrites the stored blob.
    fn save(&mut self, notes: &[Note]) -> StoreResult<()>;
}

/// Serializes the collection into the persisted blob format.
pub fn encode_blob(notes: &[Note]) -> StoreResult<String> {
    Ok(serde_json::to_string(notes)?)
}

/// Parses a persisted blob into raw records, failing soft.
pub fn decode_blob(raw: &str) -> Vec<Value> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(records)) => records,
        Ok(other) => {
            warn!(
                "event=store_load module=store status=degraded reason=not_array payload_kind={}",
                value_kind(&other)
            );
            Vec::new()
        }
        Err(err) => {
            warn!(
                "event=store_load module=store status=degraded reason=malformed_json line={} column={}",
                err.line(),
                err.column()
            );
            Vec::new()
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_blob, encode_blob};
    use crate::model::note::Note;
    use serde_json::json;

    #[test]
    fn decode_blob_returns_empty_for_non_array_payloads() {
        assert!(decode_blob("{\"id\":\"x\"}").is_empty());
        assert!(decode_blob("42").is_empty());
        assert!(decode_blob("null").is_empty());
    }

    #[test]
    fn decode_blob_returns_empty_for_malformed_json() {
        assert!(decode_blob("[{\"id\":").is_empty());
        assert!(decode_blob("").is_empty());
    }

    #[test]
    fn encode_then_decode_keeps_record_shape() {
        let notes = vec![Note::new("a", 1), Note::new("b", 2)];
        let records = decode_blob(&encode_blob(&notes).unwrap());
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["id"], json!("b"));
        assert_eq!(records[1]["createdAt"], json!(2));
    }
}
