//! Schema versioning for the result log.
//!
//! Initialization only ever creates missing objects and records the schema
//! version. It never drops or rewrites existing rows.

use rusqlite::Connection;
use tracing::debug;

use crate::error::{Error, Result};

use super::schema::SCHEMA_STATEMENTS;

/// The current schema version.
pub const CURRENT_VERSION: i32 = 1;

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

/// Create any missing tables and bring the version up to date.
///
/// Safe to call on every start.
///
/// # Errors
///
/// Returns `SchemaInitFailure` if any statement fails or the stored version
/// is unreadable or newer than this build.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])
            .map_err(|e| Error::schema_init(format!("failed to create schema: {e}")))?;
    }

    let version = schema_version(conn)?;
    if version > CURRENT_VERSION {
        return Err(Error::schema_init(format!(
            "database schema version {version} is newer than supported version {CURRENT_VERSION}"
        )));
    }
    if version < CURRENT_VERSION {
        run_migrations(conn, version)?;
    }

    Ok(())
}

/// Read the schema version from the metadata table.
///
/// Returns 0 if no version is set (fresh database).
///
/// # Errors
///
/// Returns `SchemaInitFailure` if the metadata table cannot be read.
pub fn schema_version(conn: &Connection) -> Result<i32> {
    let result: std::result::Result<String, rusqlite::Error> = conn.query_row(
        "SELECT value FROM metadata WHERE key = ?1",
        [VERSION_KEY],
        |row| row.get(0),
    );

    match result {
        Ok(value) => value
            .parse()
            .map_err(|_| Error::schema_init(format!("invalid schema version: {value}"))),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(Error::schema_init(format!("failed to read schema version: {e}"))),
    }
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, version.to_string()),
    )
    .map_err(|e| Error::schema_init(format!("failed to record schema version: {e}")))?;
    Ok(())
}

fn run_migrations(conn: &Connection, from_version: i32) -> Result<()> {
    let mut current = from_version;

    while current < CURRENT_VERSION {
        current += 1;
        debug!("Applying schema migration v{}", current);
        run_migration(conn, current)?;
    }

    set_schema_version(conn, CURRENT_VERSION)
}

fn run_migration(conn: &Connection, version: i32) -> Result<()> {
    match version {
        1 => migrate_v1(conn),
        _ => Err(Error::schema_init(format!(
            "unknown migration version: {version}"
        ))),
    }
}

/// Version 1 is the base schema created by `SCHEMA_STATEMENTS`, plus the
/// `created_at` column for results tables that predate it.
fn migrate_v1(conn: &Connection) -> Result<()> {
    if !has_column(conn, "user_data", "created_at")? {
        debug!("Adding created_at column to existing user_data table");
        conn.execute("ALTER TABLE user_data ADD COLUMN created_at TEXT", [])
            .map_err(|e| Error::schema_init(format!("failed to add created_at column: {e}")))?;
    }
    set_schema_version(conn, 1)
}

fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let inspect = |e: rusqlite::Error| Error::schema_init(format!("failed to inspect {table}: {e}"));

    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .map_err(inspect)?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(inspect)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(inspect)?;

    Ok(names.iter().any(|name| name == column))
}
