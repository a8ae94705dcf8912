//! SQLite schema creation and version checks.
//!
//! The schema version lives in SQLite's `user_version` pragma, which reads
//! 0 on a fresh file.

use std::path::Path;

use rusqlite::Connection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Database schema {found} is newer than supported schema {supported}")]
    NewerSchema { found: i32, supported: i32 },
}

/// Schema version written by this build.
pub const CURRENT_VERSION: i32 = 1;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    body TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (collection, id)
);
"#;

/// Create the document table if missing and stamp the schema version.
pub fn create_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.pragma_update(None, "user_version", CURRENT_VERSION)?;
    Ok(())
}

/// Schema version stored in the database, 0 when none was written.
pub fn get_schema_version(conn: &Connection) -> Result<i32, SchemaError> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Open or create a document database at the given path.
///
/// A database stamped by a newer build is refused rather than written to.
pub fn open_database(path: &Path) -> Result<Connection, SchemaError> {
    let conn = Connection::open(path)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;

    let found = get_schema_version(&conn)?;
    if found > CURRENT_VERSION {
        return Err(SchemaError::NewerSchema {
            found,
            supported: CURRENT_VERSION,
        });
    }
    create_schema(&conn)?;
    Ok(conn)
}

/// In-memory database with the full schema, for tests and dry runs.
pub fn open_memory() -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn)?;
    Ok(conn)
}
