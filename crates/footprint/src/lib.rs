//! `footprint` - Personal carbon footprint calculator
//!
//! This library computes an estimated annual carbon footprint from a few
//! lifestyle inputs using per-country emission factors, and keeps an
//! append-only `SQLite` log of every computed result.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod calculator;
pub mod cli;
pub mod config;
pub mod error;
pub mod factors;
pub mod logging;
pub mod record;
pub mod service;
pub mod session;
pub mod storage;

pub use calculator::{compute, CalculationInput, CalculationResult, Calculator};
pub use config::Config;
pub use error::{Error, Result};
pub use factors::{Category, CountryFactors, EmissionFactors};
pub use logging::init_logging;
pub use record::{StoredId, UserIdentity, UserRecord};
pub use service::{Assessment, AssessmentService, Persistence};
pub use session::{Session, Step};
pub use storage::{ResultStore, StoreStats};
