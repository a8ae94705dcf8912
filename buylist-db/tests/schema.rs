use buylist_db::open_memory;
use buylist_db::schema::{CURRENT_VERSION, SchemaError, create_schema, get_schema_version, open_database};

#[test]
fn create_schema_in_memory() {
    let conn = open_memory().unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
}

#[test]
fn schema_is_idempotent() {
    let conn = open_memory().unwrap();
    create_schema(&conn).unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
}

#[test]
fn documents_table_exists() {
    let conn = open_memory().unwrap();
    let exists: bool = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='documents')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert!(exists);
}

#[test]
fn fresh_file_has_no_version() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), 0);
}

#[test]
fn reopen_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("buylist.db");
    {
        let conn = open_database(&path).unwrap();
        conn.execute(
            "INSERT INTO documents (collection, id, body) VALUES ('c', 'a', '{}')",
            [],
        )
        .unwrap();
    }
    let conn = open_database(&path).unwrap();
    let count: i32 = conn
        .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn newer_schema_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    {
        let conn = open_database(&path).unwrap();
        conn.pragma_update(None, "user_version", CURRENT_VERSION + 1)
            .unwrap();
    }
    let err = open_database(&path).unwrap_err();
    assert!(matches!(
        err,
        SchemaError::NewerSchema { found, supported }
            if found == CURRENT_VERSION + 1 && supported == CURRENT_VERSION
    ));
}
