//! Diabetes risk questionnaire endpoints.
//!
//! - `GET /api/assessment/form`: questionnaire schema with defaults
//! - `POST /api/sessions/:id/assessment`: score a completed questionnaire

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::enums::RiskLabel;
use crate::models::Message;
use crate::pipeline::conversation::prompt::FORM_INVITATION;
use crate::pipeline::dispatch::Dispatcher;
use crate::pipeline::form::{FormField, RawFields, FORM_FIELDS};

#[derive(Serialize)]
pub struct FormResponse {
    pub invitation: &'static str,
    pub fields: &'static [FormField],
}

/// `GET /api/assessment/form`
pub async fn form() -> Json<FormResponse> {
    Json(FormResponse {
        invitation: FORM_INVITATION,
        fields: FORM_FIELDS,
    })
}

#[derive(Deserialize)]
pub struct AssessmentRequest {
    pub fields: RawFields,
}

#[derive(Serialize)]
pub struct AssessmentResponse {
    pub risk_label: RiskLabel,
    pub summary: Message,
    /// Why the prediction endpoint could not be used, when `risk_label` is unknown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction_error: Option<String>,
    pub messages: Vec<Message>,
}

/// `POST /api/sessions/:id/assessment`: validate, predict, append summary.
pub async fn submit(
    State(ctx): State<ApiContext>,
    Path(session_id): Path<Uuid>,
    body: Result<Json<AssessmentRequest>, JsonRejection>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    let Json(req) = body?;
    let session = ctx.sessions.get(session_id)?;

    tokio::task::spawn_blocking(move || -> Result<Json<AssessmentResponse>, ApiError> {
        let mut guard = session
            .lock()
            .map_err(|_| ApiError::Internal("session lock poisoned".into()))?;

        let dispatcher = Dispatcher::new(ctx.backend.as_ref(), ctx.predictor.as_ref());
        let outcome = dispatcher.handle_form_submission(&mut guard, &req.fields)?;

        Ok(Json(AssessmentResponse {
            risk_label: outcome.result.risk_label,
            summary: outcome.summary,
            prediction_error: outcome.failure.map(|e| e.to_string()),
            messages: guard.history().to_vec(),
        }))
    })
    .await
    .map_err(|e| ApiError::Internal(format!("assessment task failed: {e}")))?
}
