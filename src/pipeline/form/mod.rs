//! Diabetes risk questionnaire: field definitions and validation into a
//! typed `HealthDataRecord`.

pub mod fields;
pub mod collector;

pub use collector::collect;
pub use fields::*;

use thiserror::Error;

/// First constraint violated by a submitted questionnaire.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field} {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}
