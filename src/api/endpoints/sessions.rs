//! Session and chat endpoints.
//!
//! - `POST /api/sessions`: start a session (history holds the greeting)
//! - `GET /api/sessions/:id/messages`: full history
//! - `POST /api/sessions/:id/messages`: dispatch one user message

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::Message;
use crate::pipeline::conversation::prompt::FORM_INVITATION;
use crate::pipeline::conversation::SessionState;
use crate::pipeline::dispatch::{DispatchOutcome, Dispatcher};
use crate::pipeline::form::{FormField, FORM_FIELDS};

#[derive(Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub state: SessionState,
    pub messages: Vec<Message>,
}

/// `POST /api/sessions`: create and initialize a session.
pub async fn create(
    State(ctx): State<ApiContext>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let (session_id, session) = ctx.sessions.create()?;
    let guard = session
        .lock()
        .map_err(|_| ApiError::Internal("session lock poisoned".into()))?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id,
            state: guard.state(),
            messages: guard.history().to_vec(),
        }),
    ))
}

/// `GET /api/sessions/:id/messages`: the session history in order.
pub async fn history(
    State(ctx): State<ApiContext>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = ctx.sessions.get(session_id)?;

    // Waits behind any in-flight message for this session.
    tokio::task::spawn_blocking(move || -> Result<Json<SessionResponse>, ApiError> {
        let guard = session
            .lock()
            .map_err(|_| ApiError::Internal("session lock poisoned".into()))?;
        Ok(Json(SessionResponse {
            session_id,
            state: guard.state(),
            messages: guard.history().to_vec(),
        }))
    })
    .await
    .map_err(|e| ApiError::Internal(format!("history task failed: {e}")))?
}

#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

/// What the page should do after a message.
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutcomeView {
    GenericReply {
        text: String,
    },
    GenericFailure {
        message: String,
    },
    RequestFormSubmission {
        invitation: &'static str,
        form: &'static [FormField],
    },
}

impl From<DispatchOutcome> for OutcomeView {
    fn from(outcome: DispatchOutcome) -> Self {
        match outcome {
            DispatchOutcome::GenericReply { text } => OutcomeView::GenericReply { text },
            DispatchOutcome::GenericFailure { error } => OutcomeView::GenericFailure {
                message: format!("I couldn't get a reply right now. {error}"),
            },
            DispatchOutcome::RequestFormSubmission => OutcomeView::RequestFormSubmission {
                invitation: FORM_INVITATION,
                form: FORM_FIELDS,
            },
        }
    }
}

#[derive(Serialize)]
pub struct SendMessageResponse {
    pub outcome: OutcomeView,
    pub messages: Vec<Message>,
}

/// `POST /api/sessions/:id/messages`: route one user message.
///
/// The backend call is blocking, so the whole unit of work runs on the
/// blocking pool with the session lock held.
pub async fn send(
    State(ctx): State<ApiContext>,
    Path(session_id): Path<Uuid>,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<SendMessageResponse>, ApiError> {
    let Json(req) = body?;
    if req.text.trim().is_empty() {
        return Err(ApiError::EmptyInput);
    }
    let session = ctx.sessions.get(session_id)?;

    tokio::task::spawn_blocking(move || -> Result<Json<SendMessageResponse>, ApiError> {
        let mut guard = session
            .lock()
            .map_err(|_| ApiError::Internal("session lock poisoned".into()))?;

        let dispatcher = Dispatcher::new(ctx.backend.as_ref(), ctx.predictor.as_ref());
        let outcome = dispatcher.handle_user_message(&mut guard, &req.text)?;

        Ok(Json(SendMessageResponse {
            outcome: outcome.into(),
            messages: guard.history().to_vec(),
        }))
    })
    .await
    .map_err(|e| ApiError::Internal(format!("message task failed: {e}")))?
}
