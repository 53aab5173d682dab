//! In-memory note store.
//!
//! Holds the serialized blob rather than the notes themselves, so loads go
//! through the same decode path as durable stores. An optional byte quota
//! reproduces "storage full" write failures.

use crate::model::note::Note;
use crate::store::{decode_blob, encode_blob, NoteStore, StoreError, StoreResult};
use log::error;
use serde_json::Value;

#[derive(Debug, Clone, Default)]
pub struct MemoryNoteStore {
    blob: Option<String>,
    quota_bytes: Option<usize>,
    writes: usize,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with a pre-existing raw blob, valid or not.
    pub fn with_blob(raw: impl Into<String>) -> Self {
        Self {
            blob: Some(raw.into()),
            ..Self::default()
        }
    }

    /// Rejects writes whose serialized size exceeds `quota_bytes`.
    pub fn with_quota(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl NoteStore for MemoryNoteStore {
    fn load(&self) -> Vec<Value> {
        self.blob.as_deref().map(decode_blob).unwrap_or_default()
    }

    fn save(&mut self, notes: &[Note]) -> StoreResult<()> {
        let blob = encode_blob(notes)?;
        if let Some(quota_bytes) = self.quota_bytes {
            if blob.len() > quota_bytes {
                error!(
                    "event=store_save module=store status=error error_code=quota_exceeded bytes={} quota={}",
                    blob.len(),
                    quota_bytes
                );
                return Err(StoreError::QuotaExceeded {
                    required_bytes: blob.len(),
                    quota_bytes,
                });
            }
        }
        self.blob = Some(blob);
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryNoteStore;
    use crate::model::note::Note;
    use crate::store::{NoteStore, StoreError};

    #[test]
    fn missing_blob_loads_empty() {
        assert!(MemoryNoteStore::new().load().is_empty());
    }

    #[test]
    fn quota_rejects_oversized_write_and_keeps_previous_blob() {
        let mut store = MemoryNoteStore::new().with_quota(80);
        store.save(&[Note::new("a", 1)]).unwrap();
        let before = store.blob().map(str::to_string);

        let err = store
            .save(&[Note::new("a", 1), Note::new("b", 2)])
            .unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { quota_bytes: 80, .. }));
        assert_eq!(store.blob().map(str::to_string), before);
        assert_eq!(store.write_count(), 1);
    }
}
