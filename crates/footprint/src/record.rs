//! Persisted record types.
//!
//! A [`UserRecord`] joins who answered the questionnaire, what they entered
//! and what was computed. Records are written once and never updated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculator::{CalculationInput, CalculationResult};
use crate::error::{Error, Result};

/// Oldest accepted age.
pub const MAX_AGE: u8 = 120;

/// Identifier assigned by the result store.
///
/// Ids are unique and strictly increasing across the life of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredId(i64);

impl StoredId {
    /// Wrap a raw row id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw row id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for StoredId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who answered the questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Free-text name.
    pub name: String,
    /// Age in years, 0 to 120.
    pub age: u8,
    /// Free-form gender category.
    pub gender: String,
}

impl UserIdentity {
    /// Create a validated identity.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the age is above [`MAX_AGE`].
    pub fn new(name: impl Into<String>, age: u8, gender: impl Into<String>) -> Result<Self> {
        let identity = Self {
            name: name.into(),
            age,
            gender: gender.into(),
        };
        identity.validate()?;
        Ok(identity)
    }

    /// Check the age range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the age is above [`MAX_AGE`].
    pub fn validate(&self) -> Result<()> {
        if self.age > MAX_AGE {
            return Err(Error::invalid_input(
                "age",
                format!("must be between 0 and {MAX_AGE}, got {}", self.age),
            ));
        }
        Ok(())
    }
}

/// One completed calculation as stored in the result log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Identifier assigned by the store, `None` until appended.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<StoredId>,

    /// When the record was created. `None` for rows logged before the
    /// store kept timestamps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Who answered.
    pub identity: UserIdentity,

    /// Raw inputs as collected.
    pub input: CalculationInput,

    /// Computed emissions.
    pub result: CalculationResult,
}

impl UserRecord {
    /// Create an unsaved record timestamped now.
    #[must_use]
    pub fn new(identity: UserIdentity, input: CalculationInput, result: CalculationResult) -> Self {
        Self {
            id: None,
            created_at: Some(Utc::now()),
            identity,
            input,
            result,
        }
    }
}
