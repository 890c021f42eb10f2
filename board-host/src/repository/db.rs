//! Database Connection and Setup
//!
//! Opens the SQLite file and brings its schema up to date.

use std::path::Path;
use std::sync::Arc;

use applicant_board::{DomainError, DomainResult};
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::applicant_repo::ApplicantRepository;

pub(super) fn db_err(e: rusqlite::Error) -> DomainError {
    DomainError::Internal(e.to_string())
}

/// Open (or create) the database at `path` and run migrations.
/// `:memory:` gives a private in-memory database.
pub fn init_db(path: &Path) -> DomainResult<Connection> {
    let conn = Connection::open(path).map_err(db_err)?;
    run_migrations(&conn)?;
    Ok(conn)
}

/// Open the database and wrap it in a repository
pub fn open_repository(path: &Path) -> DomainResult<ApplicantRepository> {
    let conn = init_db(path)?;
    Ok(ApplicantRepository::new(Arc::new(Mutex::new(conn))))
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> DomainResult<bool> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({})", table))
        .map_err(db_err)?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(db_err)?;
    for name in names {
        if name.map_err(db_err)? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS applicants (
            id TEXT PRIMARY KEY,
            status TEXT NOT NULL DEFAULT 'submitted',
            position REAL NOT NULL DEFAULT 0,
            payload TEXT NOT NULL DEFAULT '{}',
            updated_at INTEGER
        )",
        [],
    )
    .map_err(db_err)?;

    // Attribution column arrived after the first schema
    if !column_exists(conn, "applicants", "updated_by")? {
        conn.execute("ALTER TABLE applicants ADD COLUMN updated_by TEXT", [])
            .map_err(|e| DomainError::Internal(format!("Failed to add updated_by: {}", e)))?;
    }

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_applicants_status ON applicants(status, position)",
        [],
    )
    .map_err(db_err)?;

    Ok(())
}
