//! `SQLite` schema definitions for the result log.

/// SQL statement to create the append-only results table.
pub const CREATE_USER_DATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS user_data (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    age INTEGER,
    gender TEXT,
    country TEXT,
    distance REAL,
    electricity REAL,
    waste REAL,
    meals INTEGER,
    water REAL,
    transportation REAL,
    electricity_emission REAL,
    diet_emission REAL,
    waste_emission REAL,
    water_emission REAL,
    total_emission REAL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_USER_DATA_TABLE, CREATE_METADATA_TABLE];

/// Columns selected when reading a record back, in row order.
pub const RECORD_COLUMNS: &str = "id, created_at, name, age, gender, country, \
     distance, electricity, waste, meals, water, \
     transportation, electricity_emission, diet_emission, waste_emission, water_emission, \
     total_emission";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.is_empty());
            assert!(stmt.contains("IF NOT EXISTS"));
        }
    }

    #[test]
    fn test_user_data_table_contains_required_columns() {
        assert!(CREATE_USER_DATA_TABLE.contains("id INTEGER PRIMARY KEY AUTOINCREMENT"));
        for column in [
            "name TEXT",
            "age INTEGER",
            "gender TEXT",
            "country TEXT",
            "distance REAL",
            "electricity REAL",
            "waste REAL",
            "meals INTEGER",
            "water REAL",
            "transportation REAL",
            "electricity_emission REAL",
            "diet_emission REAL",
            "waste_emission REAL",
            "water_emission REAL",
            "total_emission REAL",
        ] {
            assert!(CREATE_USER_DATA_TABLE.contains(column), "missing {column}");
        }
    }

    #[test]
    fn test_create_metadata_table_structure() {
        assert!(CREATE_METADATA_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_METADATA_TABLE.contains("value TEXT NOT NULL"));
    }
}
