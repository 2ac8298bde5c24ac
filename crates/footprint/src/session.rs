//! Questionnaire flow as an explicit value.
//!
//! A [`Session`] walks three steps: identity, lifestyle, results. Each
//! transition consumes the session and returns the next one, so a front end
//! never mutates shared state to move between pages.

use serde::{Deserialize, Serialize};

use crate::calculator::CalculationInput;
use crate::error::{Error, Result};
use crate::record::UserIdentity;

/// The page a session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Collecting name, age and gender.
    #[default]
    Identity,
    /// Collecting country and consumption habits.
    Lifestyle,
    /// Everything collected; ready to compute.
    Results,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identity => write!(f, "identity"),
            Self::Lifestyle => write!(f, "lifestyle"),
            Self::Results => write!(f, "results"),
        }
    }
}

/// Answers collected so far.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Session {
    step: Step,
    identity: Option<UserIdentity>,
    input: Option<CalculationInput>,
}

impl Session {
    /// Start a new session on the identity step.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current step.
    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    /// The identity, once submitted.
    #[must_use]
    pub fn identity(&self) -> Option<&UserIdentity> {
        self.identity.as_ref()
    }

    /// The lifestyle answers, once submitted.
    #[must_use]
    pub fn input(&self) -> Option<&CalculationInput> {
        self.input.as_ref()
    }

    /// Submit the identity page and move to the lifestyle step.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the session is not on the identity step or
    /// the identity is out of range.
    pub fn submit_identity(self, identity: UserIdentity) -> Result<Self> {
        self.expect_step(Step::Identity)?;
        identity.validate()?;
        Ok(Self {
            step: Step::Lifestyle,
            identity: Some(identity),
            input: None,
        })
    }

    /// Submit the lifestyle page and move to the results step.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the session is not on the lifestyle step or
    /// the input is out of range.
    pub fn submit_lifestyle(self, input: CalculationInput) -> Result<Self> {
        self.expect_step(Step::Lifestyle)?;
        input.validate()?;
        Ok(Self {
            step: Step::Results,
            input: Some(input),
            ..self
        })
    }

    /// Go back one page.
    ///
    /// Leaving the lifestyle step discards every answer, matching a fresh
    /// start. From the identity step this is a no-op.
    #[must_use]
    pub fn back(self) -> Self {
        match self.step {
            Step::Identity | Step::Lifestyle => Self::new(),
            Step::Results => Self {
                step: Step::Lifestyle,
                input: None,
                ..self
            },
        }
    }

    /// Discard everything and return to the first page.
    #[must_use]
    pub fn start_over(self) -> Self {
        Self::new()
    }

    /// The collected answers, available only on the results step.
    #[must_use]
    pub fn ready(&self) -> Option<(&UserIdentity, &CalculationInput)> {
        match (self.step, &self.identity, &self.input) {
            (Step::Results, Some(identity), Some(input)) => Some((identity, input)),
            _ => None,
        }
    }

    fn expect_step(&self, expected: Step) -> Result<()> {
        if self.step == expected {
            Ok(())
        } else {
            Err(Error::invalid_input(
                "session",
                format!("expected {expected} step, session is on {} step", self.step),
            ))
        }
    }
}
