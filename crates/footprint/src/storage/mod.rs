//! Append-only result store.
//!
//! Each completed calculation is written as one row of the `user_data`
//! table. Rows are never updated or deleted by this crate; ids come from
//! `AUTOINCREMENT` and so are unique and strictly increasing for the life of
//! the database.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use tracing::{debug, info, warn};

use crate::calculator::{CalculationInput, CalculationResult};
use crate::error::{Error, Result};
use crate::record::{StoredId, UserIdentity, UserRecord};

use schema::RECORD_COLUMNS;

/// Default time a writer waits for a competing writer's lock.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const IN_MEMORY_PATH: &str = ":memory:";

/// `SQLite`-backed append-only log of user records.
#[derive(Debug)]
pub struct ResultStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

fn unavailable(path: &Path) -> impl FnOnce(rusqlite::Error) -> Error + '_ {
    move |source| Error::StorageUnavailable {
        path: path.to_path_buf(),
        source,
    }
}

impl ResultStore {
    /// Open or create a store at the given path with the default busy timeout.
    ///
    /// # Errors
    ///
    /// See [`ResultStore::open_with_timeout`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_timeout(path, DEFAULT_BUSY_TIMEOUT)
    }

    /// Open or create a store at the given path.
    ///
    /// Creates parent directories as needed and ensures the schema exists.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryCreate` if the parent directory cannot be created,
    /// `StorageUnavailable` if the database cannot be opened, and
    /// `SchemaInitFailure` if the schema cannot be created.
    pub fn open_with_timeout(path: impl AsRef<Path>, busy_timeout: Duration) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening result store at {}", path.display());
        let conn = Connection::open(&path).map_err(unavailable(&path))?;

        conn.busy_timeout(busy_timeout).map_err(unavailable(&path))?;
        // WAL with FULL sync: a committed append survives power loss.
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=FULL;")
            .map_err(unavailable(&path))?;

        let store = Self { path, conn };
        store.ensure_schema()?;

        info!("Result store opened at {}", store.path.display());
        Ok(store)
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let path = PathBuf::from(IN_MEMORY_PATH);
        let conn = Connection::open_in_memory().map_err(unavailable(&path))?;

        let store = Self { path, conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the backing tables if they are absent.
    ///
    /// Idempotent; never drops or alters existing rows.
    ///
    /// # Errors
    ///
    /// Returns `SchemaInitFailure` if the schema cannot be created.
    pub fn ensure_schema(&self) -> Result<()> {
        migrations::initialize_schema(&self.conn)
    }

    /// The schema version recorded in the database.
    ///
    /// # Errors
    ///
    /// Returns `SchemaInitFailure` if the version cannot be read.
    pub fn schema_version(&self) -> Result<i32> {
        migrations::schema_version(&self.conn)
    }

    /// Append a record and return its assigned id.
    ///
    /// The row is committed before this returns. Any id already on `record`
    /// is ignored.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the write cannot be committed.
    pub fn append(&mut self, record: &UserRecord) -> Result<StoredId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(unavailable(&self.path))?;

        let UserRecord {
            created_at,
            identity,
            input,
            result,
            ..
        } = record;

        tx.execute(
            r"
            INSERT INTO user_data (
                name, age, gender, country,
                distance, electricity, waste, meals, water,
                transportation, electricity_emission, diet_emission, waste_emission, water_emission,
                total_emission, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            ",
            params![
                identity.name,
                identity.age,
                identity.gender,
                input.country,
                input.daily_distance_km,
                input.monthly_electricity_kwh,
                input.weekly_waste_kg,
                input.meals_per_day,
                input.daily_water_liters,
                result.transportation,
                result.electricity,
                result.diet,
                result.waste,
                result.water,
                result.total,
                created_at.unwrap_or_else(Utc::now).to_rfc3339(),
            ],
        )
        .map_err(unavailable(&self.path))?;

        let id = StoredId::new(tx.last_insert_rowid());
        tx.commit().map_err(unavailable(&self.path))?;

        debug!("Appended record with id {}", id);
        Ok(id)
    }

    /// Get a record by its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, id: StoredId) -> Result<Option<UserRecord>> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM user_data WHERE id = ?1");
        let record = self
            .conn
            .query_row(&sql, [id.get()], Self::row_to_record)
            .optional()?;
        Ok(record)
    }

    /// Get the most recent records, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn recent(&self, limit: usize) -> Result<Vec<UserRecord>> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM user_data ORDER BY id DESC LIMIT ?1");
        let mut stmt = self.conn.prepare(&sql)?;

        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let records = stmt
            .query_map([limit_i64], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Get records in insertion order, starting after the given id.
    ///
    /// Pass `None` to start from the first record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn page(&self, after: Option<StoredId>, limit: usize) -> Result<Vec<UserRecord>> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM user_data WHERE id > ?1 ORDER BY id ASC LIMIT ?2"
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let after_i64 = after.map_or(0, StoredId::get);
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let records = stmt
            .query_map(params![after_i64, limit_i64], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Count records in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM user_data", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get store statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StoreStats> {
        let total_records = self.count()?;

        let (first, last): (Option<String>, Option<String>) = self.conn.query_row(
            r"
            SELECT
                (SELECT created_at FROM user_data WHERE created_at IS NOT NULL ORDER BY id ASC LIMIT 1),
                (SELECT created_at FROM user_data WHERE created_at IS NOT NULL ORDER BY id DESC LIMIT 1)
            ",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let db_size_bytes = if self.path.as_os_str() == IN_MEMORY_PATH {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StoreStats {
            total_records,
            first_created: first.as_deref().and_then(parse_timestamp),
            last_created: last.as_deref().and_then(parse_timestamp),
            db_size_bytes,
            schema_version: self.schema_version()?,
        })
    }

    #[cfg(test)]
    pub(crate) fn conn_for_tests(&self) -> &Connection {
        &self.conn
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<UserRecord> {
        let id: i64 = row.get(0)?;
        let created_at_str: Option<String> = row.get(1)?;

        let created_at = created_at_str.as_deref().and_then(|value| {
            let parsed = parse_timestamp(value);
            if parsed.is_none() {
                warn!("Unparseable created_at '{}' on record {}", value, id);
            }
            parsed
        });

        let identity = UserIdentity {
            name: row.get(2)?,
            age: row.get(3)?,
            gender: row.get(4)?,
        };

        let input = CalculationInput {
            country: row.get(5)?,
            daily_distance_km: row.get(6)?,
            monthly_electricity_kwh: row.get(7)?,
            weekly_waste_kg: row.get(8)?,
            meals_per_day: row.get(9)?,
            daily_water_liters: row.get(10)?,
        };

        let result = CalculationResult {
            transportation: row.get(11)?,
            electricity: row.get(12)?,
            diet: row.get(13)?,
            waste: row.get(14)?,
            water: row.get(15)?,
            total: row.get(16)?,
        };

        Ok(UserRecord {
            id: Some(StoredId::new(id)),
            created_at,
            identity,
            input,
            result,
        })
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Statistics about the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    /// Total number of records stored.
    pub total_records: i64,
    /// Creation time of the first record.
    pub first_created: Option<DateTime<Utc>>,
    /// Creation time of the latest record.
    pub last_created: Option<DateTime<Utc>>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
    /// Schema version recorded in the database.
    pub schema_version: i32,
}
