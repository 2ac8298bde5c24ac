//! Error types for footprint.
//!
//! Calculator errors (`UnknownCountry`, `InvalidInput`) are caller-correctable
//! and surface before anything is persisted. Store errors
//! (`StorageUnavailable`, `SchemaInitFailure`) are environment-level.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for footprint operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Calculator Errors ===
    /// The country has no entry in the emission factor table.
    #[error("unknown country: {country}")]
    UnknownCountry {
        /// The country key that was looked up.
        country: String,
    },

    /// A raw input value is out of range.
    #[error("invalid input for {field}: {message}")]
    InvalidInput {
        /// Name of the offending field.
        field: &'static str,
        /// Description of what is wrong with the value.
        message: String,
    },

    // === Storage Errors ===
    /// The result store could not be opened or written.
    #[error("result store unavailable at {path}: {source}")]
    StorageUnavailable {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// Creating or upgrading the store schema failed.
    #[error("schema initialization failed: {message}")]
    SchemaInitFailure {
        /// Description of what went wrong.
        message: String,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// A specialized Result type for footprint operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an unknown country error.
    #[must_use]
    pub fn unknown_country(country: impl Into<String>) -> Self {
        Self::UnknownCountry {
            country: country.into(),
        }
    }

    /// Create an invalid input error for the named field.
    #[must_use]
    pub fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
        }
    }

    /// Create a schema initialization error.
    #[must_use]
    pub fn schema_init(message: impl Into<String>) -> Self {
        Self::SchemaInitFailure {
            message: message.into(),
        }
    }

    /// Check if the caller can fix this error by changing its input.
    #[must_use]
    pub fn is_caller_correctable(&self) -> bool {
        matches!(self, Self::UnknownCountry { .. } | Self::InvalidInput { .. })
    }

    /// Check if this error comes from the result store.
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Self::StorageUnavailable { .. }
                | Self::SchemaInitFailure { .. }
                | Self::DatabaseQuery(_)
                | Self::DirectoryCreate { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_country_display() {
        let err = Error::unknown_country("Atlantis");
        assert_eq!(err.to_string(), "unknown country: Atlantis");
    }

    #[test]
    fn test_invalid_input_display() {
        let err = Error::invalid_input("meals_per_day", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "invalid input for meals_per_day: must be at least 1"
        );
    }

    #[test]
    fn test_calculator_errors_are_caller_correctable() {
        assert!(Error::unknown_country("Atlantis").is_caller_correctable());
        assert!(Error::invalid_input("age", "too old").is_caller_correctable());
        assert!(!Error::schema_init("boom").is_caller_correctable());
    }

    #[test]
    fn test_storage_errors() {
        assert!(Error::schema_init("boom").is_storage_error());
        assert!(!Error::unknown_country("Atlantis").is_storage_error());
        assert!(!Error::invalid_input("age", "too old").is_storage_error());
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
            assert!(err.is_storage_error());
        }
    }

    #[test]
    fn test_storage_unavailable_display() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(source) = result {
            let err = Error::StorageUnavailable {
                path: PathBuf::from("/nonexistent/path/db.sqlite"),
                source,
            };
            assert!(err.to_string().contains("/nonexistent/path/db.sqlite"));
            assert!(err.is_storage_error());
        }
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "busy_timeout_ms must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("busy_timeout_ms"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
