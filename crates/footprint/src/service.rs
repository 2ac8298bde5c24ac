//! Entry point for front ends: compute, then log.
//!
//! Calculator errors are returned before the store is touched. Store errors
//! are logged and reported on the [`Assessment`] but never discard the
//! computed result.

use serde::Serialize;
use tracing::{info, warn};

use crate::calculator::{CalculationInput, CalculationResult, Calculator};
use crate::error::{Error, Result};
use crate::record::{StoredId, UserIdentity, UserRecord};
use crate::session::Session;
use crate::storage::ResultStore;

/// What happened to the record after computing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum Persistence {
    /// The record was appended with this id.
    Stored(StoredId),
    /// No store is attached.
    Disabled,
    /// The append failed; the result is still valid.
    Failed(String),
}

impl Persistence {
    /// The stored id, if the append succeeded.
    #[must_use]
    pub fn stored_id(&self) -> Option<StoredId> {
        match self {
            Self::Stored(id) => Some(*id),
            Self::Disabled | Self::Failed(_) => None,
        }
    }
}

/// A computed footprint and the fate of its record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    /// The computed emissions.
    pub result: CalculationResult,
    /// Outcome of the append.
    pub persistence: Persistence,
}

/// Combines a calculator with an optional result store.
#[derive(Debug)]
pub struct AssessmentService {
    calculator: Calculator,
    store: Option<ResultStore>,
}

impl AssessmentService {
    /// Create a service that logs to `store`.
    #[must_use]
    pub fn new(calculator: Calculator, store: ResultStore) -> Self {
        Self {
            calculator,
            store: Some(store),
        }
    }

    /// Create a service that computes without logging.
    #[must_use]
    pub fn without_store(calculator: Calculator) -> Self {
        Self {
            calculator,
            store: None,
        }
    }

    /// The calculator in use.
    #[must_use]
    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    /// The attached store, if any.
    #[must_use]
    pub fn store(&self) -> Option<&ResultStore> {
        self.store.as_ref()
    }

    /// Compute a footprint and append the combined record.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` or `UnknownCountry` from validation or the
    /// calculator. Nothing is persisted in that case. Store failures are not
    /// errors; they are reported as [`Persistence::Failed`].
    pub fn assess(
        &mut self,
        identity: &UserIdentity,
        input: &CalculationInput,
    ) -> Result<Assessment> {
        identity.validate()?;
        let result = self.calculator.compute(input)?;

        let persistence = match self.store.as_mut() {
            None => Persistence::Disabled,
            Some(store) => {
                let record = UserRecord::new(identity.clone(), input.clone(), result);
                match store.append(&record) {
                    Ok(id) => {
                        info!(id = %id, country = %input.country, total = result.total, "Recorded footprint");
                        Persistence::Stored(id)
                    }
                    Err(e) => {
                        warn!("Failed to record footprint, result not logged: {}", e);
                        Persistence::Failed(e.to_string())
                    }
                }
            }
        };

        Ok(Assessment {
            result,
            persistence,
        })
    }

    /// Assess a session that has reached the results step.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the session is not complete, otherwise as
    /// [`AssessmentService::assess`].
    pub fn assess_session(&mut self, session: &Session) -> Result<Assessment> {
        let (identity, input) = session.ready().ok_or_else(|| {
            Error::invalid_input(
                "session",
                format!("session is on {} step, not results", session.step()),
            )
        })?;
        self.assess(identity, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logging;

    fn identity() -> UserIdentity {
        UserIdentity::new("Meera", 41, "Female").unwrap()
    }

    fn india() -> CalculationInput {
        CalculationInput::new("India", 10.0, 200.0, 5.0, 3, 100.0)
    }

    fn service() -> AssessmentService {
        AssessmentService::new(Calculator::default(), ResultStore::open_in_memory().unwrap())
    }

    fn stored_count(service: &AssessmentService) -> i64 {
        service.store().unwrap().count().unwrap()
    }

    #[test]
    fn test_assess_stores_record() {
        init_test_logging();
        let mut service = service();

        let assessment = service.assess(&identity(), &india()).unwrap();
        let id = assessment.persistence.stored_id().expect("record should be stored");

        let record = service.store().unwrap().get(id).unwrap().unwrap();
        assert_eq!(record.result, assessment.result);
        assert_eq!(record.identity, identity());
        assert_eq!(record.input, india());
    }

    #[test]
    fn test_unknown_country_is_not_stored() {
        let mut service = service();
        let input = CalculationInput::new("Atlantis", 10.0, 200.0, 5.0, 3, 100.0);

        let err = service.assess(&identity(), &input).unwrap_err();
        assert!(matches!(err, Error::UnknownCountry { .. }));
        assert_eq!(stored_count(&service), 0);
    }

    #[test]
    fn test_invalid_input_is_not_stored() {
        let mut service = service();
        let input = CalculationInput::new("India", -1.0, 0.0, 0.0, 1, 0.0);

        assert!(service.assess(&identity(), &input).is_err());
        assert_eq!(stored_count(&service), 0);
    }

    #[test]
    fn test_invalid_identity_is_not_stored() {
        let mut service = service();
        let bad = UserIdentity {
            name: "Nobody".to_string(),
            age: 200,
            gender: "Other".to_string(),
        };

        assert!(service.assess(&bad, &india()).is_err());
        assert_eq!(stored_count(&service), 0);
    }

    #[test]
    fn test_without_store() {
        let mut service = AssessmentService::without_store(Calculator::default());
        let assessment = service.assess(&identity(), &india()).unwrap();

        assert_eq!(assessment.persistence, Persistence::Disabled);
        assert!(assessment.persistence.stored_id().is_none());
        assert!((assessment.result.total - 4.603_75).abs() < 1e-9);
    }

    #[test]
    fn test_store_failure_keeps_result() {
        init_test_logging();
        let mut service = service();
        if let Some(store) = service.store.as_ref() {
            store
                .conn_for_tests()
                .execute_batch("DROP TABLE user_data")
                .unwrap();
        }

        let assessment = service.assess(&identity(), &india()).unwrap();
        assert!(matches!(assessment.persistence, Persistence::Failed(_)));
        assert!((assessment.result.total - 4.603_75).abs() < 1e-9);
    }

    #[test]
    fn test_assess_session() {
        let mut service = service();
        let session = Session::new()
            .submit_identity(identity())
            .unwrap()
            .submit_lifestyle(india())
            .unwrap();

        let assessment = service.assess_session(&session).unwrap();
        assert!(assessment.persistence.stored_id().is_some());
    }

    #[test]
    fn test_assess_incomplete_session() {
        let mut service = service();
        let session = Session::new().submit_identity(identity()).unwrap();

        let err = service.assess_session(&session).unwrap_err();
        assert!(err.to_string().contains("lifestyle"));
        assert_eq!(stored_count(&service), 0);
    }

    #[test]
    fn test_persistence_serialization() {
        let json = serde_json::to_string(&Persistence::Stored(StoredId::new(3))).unwrap();
        assert_eq!(json, r#"{"status":"stored","detail":3}"#);

        let json = serde_json::to_string(&Persistence::Disabled).unwrap();
        assert_eq!(json, r#"{"status":"disabled"}"#);
    }
}
