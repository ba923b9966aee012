//! Client for the external diabetes prediction endpoint.

pub mod client;

pub use client::*;

use thiserror::Error;

use crate::models::{HealthDataRecord, PredictionResult};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Prediction endpoint unreachable at {endpoint}: {detail}")]
    NetworkFailure { endpoint: String, detail: String },

    #[error("Prediction endpoint returned status {status_code}: {body}")]
    UnexpectedStatus { status_code: u16, body: String },

    #[error("Prediction endpoint returned an unusable body (status {status_code}): {body}")]
    MalformedBody { status_code: u16, body: String },

    #[error("HTTP client error: {0}")]
    ClientSetup(String),
}

impl TransportError {
    /// HTTP status of the failed exchange, when a response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status_code, .. } | Self::MalformedBody { status_code, .. } => {
                Some(*status_code)
            }
            Self::NetworkFailure { .. } | Self::ClientSetup(_) => None,
        }
    }
}

/// Scores a questionnaire record (allows mocking).
pub trait RiskPredictor: Send + Sync {
    fn predict(&self, record: &HealthDataRecord) -> Result<PredictionResult, TransportError>;
}

/// Mock predictor for testing: returns a fixed outcome and counts calls.
#[cfg(test)]
pub(crate) struct MockPredictor {
    outcome: Result<PredictionResult, TransportError>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockPredictor {
    pub fn returning(result: PredictionResult) -> Self {
        Self {
            outcome: Ok(result),
            calls: Default::default(),
        }
    }

    pub fn failing(error: TransportError) -> Self {
        Self {
            outcome: Err(error),
            calls: Default::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl RiskPredictor for MockPredictor {
    fn predict(&self, _record: &HealthDataRecord) -> Result<PredictionResult, TransportError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.outcome.clone()
    }
}
