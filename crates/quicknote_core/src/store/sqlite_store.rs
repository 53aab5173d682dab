//! SQLite-backed note store.
//!
//! # Responsibility
//! - Persist the serialized note collection as one `kv_store` row.
//!
//! # Invariants
//! - Exactly one row per storage key; writes upsert that row.
//! - Read errors degrade to an empty collection and are logged.

use crate::db::{open_db, open_db_in_memory};
use crate::model::note::Note;
use crate::store::{decode_blob, encode_blob, NoteStore, StoreError, StoreResult};
use log::{debug, error, warn};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;

/// Fixed storage key for the note collection.
pub const NOTES_STORAGE_KEY: &str = "quicknote.notes";

/// Note store writing one JSON blob into a migrated SQLite database.
pub struct SqliteNoteStore {
    conn: Connection,
    key: String,
}

impl SqliteNoteStore {
    /// Wraps a migrated connection, using `NOTES_STORAGE_KEY`.
    ///
    /// # Errors
    /// - `StoreError::MissingRequiredTable` when migrations were not applied.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        ensure_store_ready(&conn)?;
        Ok(Self {
            conn,
            key: NOTES_STORAGE_KEY.to_string(),
        })
    }

    /// Opens (or creates) a database file and wraps it.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::try_new(open_db(path)?)
    }

    /// Opens a throwaway in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    /// Stores the collection under a different key.
    ///
    /// Independent collections can share one database this way.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the raw stored blob, if any.
    pub fn load_raw(&self) -> StoreResult<Option<String>> {
        let raw = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [self.key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(raw)
    }

    /// Overwrites the stored blob verbatim, bypassing serialization.
    pub fn save_raw(&self, raw: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![self.key.as_str(), raw],
        )?;
        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl NoteStore for SqliteNoteStore {
    fn load(&self) -> Vec<Value> {
        match self.load_raw() {
            Ok(Some(raw)) => decode_blob(&raw),
            Ok(None) => {
                debug!("event=store_load module=store status=empty reason=missing_key");
                Vec::new()
            }
            Err(err) => {
                warn!(
                    "event=store_load module=store status=degraded reason=read_failed error={}",
                    err
                );
                Vec::new()
            }
        }
    }

    fn save(&mut self, notes: &[Note]) -> StoreResult<()> {
        let blob = encode_blob(notes)?;
        self.save_raw(&blob).map_err(|err| {
            error!(
                "event=store_save module=store status=error count={} bytes={} error={}",
                notes.len(),
                blob.len(),
                err
            );
            err
        })?;
        debug!(
            "event=store_save module=store status=ok count={} bytes={}",
            notes.len(),
            blob.len()
        );
        Ok(())
    }
}

fn ensure_store_ready(conn: &Connection) -> StoreResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = 'kv_store'
        );",
        [],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(StoreError::MissingRequiredTable("kv_store"));
    }
    Ok(())
}
