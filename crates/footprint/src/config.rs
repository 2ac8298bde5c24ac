//! Configuration management for footprint.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::factors::EmissionFactors;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "footprint";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "footprint.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FOOTPRINT_`)
/// 2. TOML config file at `~/.config/footprint/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Calculator configuration.
    pub calculator: CalculatorConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/footprint/footprint.db`
    pub database_path: Option<PathBuf>,
    /// How long an append waits for another writer's lock, in milliseconds.
    pub busy_timeout_ms: u64,
    /// Append each calculation to the result log.
    pub persist_results: bool,
}

/// Calculator-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Country used when none is given on the command line.
    pub default_country: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            busy_timeout_ms: 5_000,
            persist_results: true,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("FOOTPRINT_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a single configuration file, ignoring the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigValidation` if the file does not exist or holds invalid
    /// values, and `ConfigLoad` if it cannot be parsed.
    pub fn validate_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigValidation {
                message: format!("configuration file {} does not exist", path.display()),
            });
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration against the built-in factor table.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        self.validate_against(&EmissionFactors::builtin())
    }

    /// Validate the configuration against a factor table.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate_against(&self, factors: &EmissionFactors) -> Result<()> {
        if self.storage.busy_timeout_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "busy_timeout_ms must be greater than 0".to_string(),
            });
        }

        if let Some(country) = &self.calculator.default_country {
            if !factors.contains(country) {
                return Err(Error::ConfigValidation {
                    message: format!("default_country '{country}' has no emission factors"),
                });
            }
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the busy timeout as a Duration.
    #[must_use]
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.storage.busy_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert_eq!(config.storage.busy_timeout_ms, 5_000);
        assert!(config.storage.persist_results);
        assert!(config.calculator.default_country.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_busy_timeout() {
        let mut config = Config::default();
        config.storage.busy_timeout_ms = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("busy_timeout_ms"));
    }

    #[test]
    fn test_validate_known_default_country() {
        let mut config = Config::default();
        config.calculator.default_country = Some("France".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_unknown_default_country() {
        let mut config = Config::default();
        config.calculator.default_country = Some("Atlantis".to_string());

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("Atlantis"));
    }

    #[test]
    fn test_database_path_default() {
        let path = Config::default().database_path();
        assert!(path.to_string_lossy().contains("footprint.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/results.db"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/results.db")
        );
    }

    #[test]
    fn test_busy_timeout() {
        assert_eq!(Config::default().busy_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("footprint"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_default_data_dir() {
        assert!(Config::default_data_dir()
            .to_string_lossy()
            .contains("footprint"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!(
            "footprint_config_test_{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "[storage]\nbusy_timeout_ms = 250\npersist_results = false\n\n[calculator]\ndefault_country = \"Japan\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path.clone())).unwrap();
        assert_eq!(config.storage.busy_timeout_ms, 250);
        assert!(!config.storage.persist_results);
        assert_eq!(config.calculator.default_country.as_deref(), Some("Japan"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let path = std::env::temp_dir().join(format!(
            "footprint_bad_config_test_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[calculator]\ndefault_country = \"Atlantis\"\n").unwrap();

        let result = Config::load_from(Some(path.clone()));
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_validate_file() {
        let dir = std::env::temp_dir();
        let pid = std::process::id();

        let good = dir.join(format!("footprint_validate_good_{pid}.toml"));
        std::fs::write(&good, "[storage]\nbusy_timeout_ms = 10\n").unwrap();
        assert_eq!(
            Config::validate_file(&good).unwrap().storage.busy_timeout_ms,
            10
        );

        let zero = dir.join(format!("footprint_validate_zero_{pid}.toml"));
        std::fs::write(&zero, "[storage]\nbusy_timeout_ms = 0\n").unwrap();
        assert!(matches!(
            Config::validate_file(&zero),
            Err(Error::ConfigValidation { .. })
        ));

        let malformed = dir.join(format!("footprint_validate_malformed_{pid}.toml"));
        std::fs::write(&malformed, "[storage\nbusy_timeout_ms = ").unwrap();
        assert!(matches!(
            Config::validate_file(&malformed),
            Err(Error::ConfigLoad(_))
        ));

        let missing = dir.join(format!("footprint_validate_missing_{pid}.toml"));
        let err = Config::validate_file(&missing).unwrap_err();
        assert!(err.to_string().contains("does not exist"));

        for path in [good, zero, malformed] {
            let _ = std::fs::remove_file(path);
        }
    }

    #[test]
    fn test_storage_config_deserialize() {
        let json = r#"{"busy_timeout_ms": 100}"#;
        let storage: StorageConfig = serde_json::from_str(json).unwrap();
        assert_eq!(storage.busy_timeout_ms, 100);
        assert!(storage.persist_results);
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("busy_timeout_ms"));
        assert!(json.contains("default_country"));
    }
}
