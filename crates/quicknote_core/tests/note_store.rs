use quicknote_core::{
    ManualClock, NoteRepository, NoteStore, SequentialIdGenerator, SqliteNoteStore, StoreError,
    NOTES_STORAGE_KEY,
};
use rusqlite::Connection;
use serde_json::json;
use std::rc::Rc;

fn repo_over(store: SqliteNoteStore, now_ms: i64) -> NoteRepository<SqliteNoteStore> {
    NoteRepository::new(
        store,
        Rc::new(ManualClock::new(now_ms)),
        Box::new(SequentialIdGenerator::default()),
    )
}

#[test]
fn missing_key_loads_empty_collection() {
    let store = SqliteNoteStore::open_in_memory().unwrap();
    assert_eq!(store.key(), NOTES_STORAGE_KEY);
    assert!(store.load_raw().unwrap().is_none());
    assert!(store.load().is_empty());
}

#[test]
fn malformed_json_loads_empty_collection() {
    let store = SqliteNoteStore::open_in_memory().unwrap();
    store.save_raw("[{\"id\": \"x\",").unwrap();
    assert!(store.load().is_empty());
}

#[test]
fn non_array_payload_loads_empty_collection() {
    let store = SqliteNoteStore::open_in_memory().unwrap();
    store
        .save_raw(&json!({ "id": "x", "title": "not a list" }).to_string())
        .unwrap();
    assert!(store.load().is_empty());
}

#[test]
fn save_overwrites_single_row() {
    let mut repo = repo_over(SqliteNoteStore::open_in_memory().unwrap(), 1_000);
    repo.create().unwrap();
    repo.create().unwrap();

    let rows: i64 = repo
        .store()
        .connection()
        .query_row("SELECT COUNT(*) FROM kv_store;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
    assert_eq!(repo.store().load().len(), 2);
}

#[test]
fn notes_survive_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");

    {
        let mut repo = repo_over(SqliteNoteStore::open(&path).unwrap(), 1_000);
        let id = repo.create().unwrap();
        assert!(repo
            .update(&id, "Groceries".to_string(), "milk, eggs".to_string())
            .unwrap());
    }

    let mut reopened = repo_over(SqliteNoteStore::open(&path).unwrap(), 9_999);
    let loaded = reopened.load_all().to_vec();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id(), "n1");
    assert_eq!(loaded[0].title(), "Groceries");
    assert_eq!(loaded[0].content(), "milk, eggs");
    assert_eq!(loaded[0].created_at(), 1_000);
    assert_eq!(loaded[0].updated_at(), 1_000);
}

#[test]
fn separate_keys_hold_independent_collections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.db");

    let mut work = repo_over(
        SqliteNoteStore::open(&path).unwrap().with_key("work.notes"),
        1_000,
    );
    work.create().unwrap();
    work.create().unwrap();

    let mut home = repo_over(
        SqliteNoteStore::open(&path).unwrap().with_key("home.notes"),
        1_000,
    );
    assert!(home.load_all().is_empty());
    home.create().unwrap();

    let mut work_again = repo_over(
        SqliteNoteStore::open(&path).unwrap().with_key("work.notes"),
        1_000,
    );
    assert_eq!(work_again.load_all().len(), 2);
}

#[test]
fn unmigrated_connection_is_rejected() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteNoteStore::try_new(conn)
        .err()
        .expect("store over unmigrated connection must fail");
    assert!(matches!(err, StoreError::MissingRequiredTable("kv_store")));
}

#[test]
fn persisted_blob_uses_camel_case_records() {
    let mut repo = repo_over(SqliteNoteStore::open_in_memory().unwrap(), 1_000);
    repo.create().unwrap();

    let raw = repo.store().load_raw().unwrap().expect("blob written");
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        json!([{
            "id": "n1",
            "title": "",
            "content": "",
            "createdAt": 1_000,
            "updatedAt": 1_000
        }])
    );
}
