//! Routes user input between the chat backend and the risk questionnaire.
//!
//! Two separate phases:
//! - `handle_user_message` answers a chat turn, or signals that the
//!   questionnaire should be shown (no assistant turn is appended then);
//! - `handle_form_submission` runs later, when the display surface posts
//!   the completed questionnaire, and appends the result summary.

use thiserror::Error;

use super::conversation::prompt::assessment_summary;
use super::conversation::{BackendError, ConversationError, ConversationSession, ReplyBackend};
use super::form::{collect, RawFields, ValidationError};
use super::intent::{classify, Intent};
use super::prediction::{RiskPredictor, TransportError};
use crate::models::{HealthDataRecord, Message, PredictionResult};

/// What happened to a user chat message.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// The backend answered and the reply was appended.
    GenericReply { text: String },
    /// The backend failed; only the user turn was appended.
    GenericFailure { error: BackendError },
    /// The message asked about diabetes risk; show the questionnaire.
    RequestFormSubmission,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    #[error(transparent)]
    Conversation(#[from] ConversationError),

    #[error("Invalid answer: {0}")]
    Validation(#[from] ValidationError),
}

/// Result of a scored questionnaire.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentOutcome {
    pub record: HealthDataRecord,
    pub result: PredictionResult,
    /// The assistant turn appended to the session.
    pub summary: Message,
    /// Set when the prediction endpoint failed and the result is `Unknown`.
    pub failure: Option<TransportError>,
}

pub struct Dispatcher<'a, B: ReplyBackend + ?Sized, P: RiskPredictor + ?Sized> {
    backend: &'a B,
    predictor: &'a P,
}

impl<'a, B: ReplyBackend + ?Sized, P: RiskPredictor + ?Sized> Dispatcher<'a, B, P> {
    pub fn new(backend: &'a B, predictor: &'a P) -> Self {
        Self { backend, predictor }
    }

    /// Handle one chat message.
    ///
    /// Empty input is rejected before anything is appended. Backend failures
    /// are reported as `GenericFailure` rather than as an error.
    pub fn handle_user_message(
        &self,
        session: &mut ConversationSession,
        raw_text: &str,
    ) -> Result<DispatchOutcome, ConversationError> {
        if raw_text.trim().is_empty() {
            return Err(ConversationError::EmptyInput);
        }

        let text = session.append_user_turn(raw_text)?.text.clone();

        let intent = classify(&text);
        tracing::info!(session_id = %session.id(), ?intent, "Routed user message");

        match intent {
            Intent::RiskAssessment => Ok(DispatchOutcome::RequestFormSubmission),
            Intent::Generic => match session.request_generic_reply(self.backend, &text) {
                Ok(reply) => {
                    session.append_assistant_turn(&reply)?;
                    Ok(DispatchOutcome::GenericReply { text: reply })
                }
                Err(ConversationError::Backend(error)) => {
                    tracing::warn!(session_id = %session.id(), %error, "Generic reply failed");
                    Ok(DispatchOutcome::GenericFailure { error })
                }
                Err(other) => Err(other),
            },
        }
    }

    /// Handle a completed questionnaire.
    ///
    /// Invalid answers leave the session untouched so the form can be shown
    /// again. A failed prediction is never guessed: it becomes `Unknown`.
    pub fn handle_form_submission(
        &self,
        session: &mut ConversationSession,
        raw: &RawFields,
    ) -> Result<AssessmentOutcome, DispatchError> {
        if !session.is_active() {
            return Err(ConversationError::IllegalState("submit a questionnaire").into());
        }

        let record = collect(raw)?;

        let (result, failure) = match self.predictor.predict(&record) {
            Ok(result) => (result, None),
            Err(error) => {
                tracing::warn!(session_id = %session.id(), %error, "Risk prediction failed");
                (PredictionResult::unknown(), Some(error))
            }
        };
        tracing::info!(
            session_id = %session.id(),
            risk = result.risk_label.as_str(),
            "Questionnaire scored"
        );

        let summary = session
            .append_assistant_turn(&assessment_summary(&result))?
            .clone();

        Ok(AssessmentOutcome {
            record,
            result,
            summary,
            failure,
        })
    }
}
