//! API error types with structured JSON responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::pipeline::conversation::ConversationError;
use crate::pipeline::dispatch::DispatchError;
use crate::pipeline::form::ValidationError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
    /// Questionnaire field that failed validation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Message cannot be empty")]
    EmptyInput,
    #[error("Session not ready: {0}")]
    SessionState(String),
    #[error("Invalid answer for {field}: {reason}")]
    Validation { field: &'static str, reason: String },
    #[error("Invalid request body: {message}")]
    InvalidBody { status: StatusCode, message: String },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Upstream error: {0}")]
    Upstream(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, field) = match &self {
            ApiError::EmptyInput => (
                StatusCode::BAD_REQUEST,
                "EMPTY_INPUT",
                "Message cannot be empty".to_string(),
                None,
            ),
            ApiError::SessionState(detail) => (
                StatusCode::CONFLICT,
                "ILLEGAL_STATE",
                detail.clone(),
                None,
            ),
            ApiError::Validation { field, reason } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_FAILED",
                format!("{field} {reason}"),
                Some(*field),
            ),
            ApiError::InvalidBody { status, message } => {
                (*status, "INVALID_BODY", message.clone(), None)
            }
            ApiError::NotFound(detail) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                detail.clone(),
                None,
            ),
            ApiError::Upstream(detail) => {
                tracing::warn!(detail, "API upstream error");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    detail.clone(),
                    None,
                )
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code,
                message,
                field,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ConversationError> for ApiError {
    fn from(err: ConversationError) -> Self {
        match err {
            ConversationError::EmptyInput => ApiError::EmptyInput,
            ConversationError::IllegalState(_) => ApiError::SessionState(err.to_string()),
            ConversationError::Backend(e) => ApiError::Upstream(e.to_string()),
        }
    }
}

/// Malformed or mistyped JSON bodies keep the rejection's status (400, 415
/// or 422) but use the structured error body.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation {
            field: err.field,
            reason: err.reason,
        }
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Conversation(e) => e.into(),
            DispatchError::Validation(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn json_of(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn empty_input_returns_400() {
        let response = ApiError::from(ConversationError::EmptyInput).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_of(response).await;
        assert_eq!(json["error"]["code"], "EMPTY_INPUT");
        assert!(json["error"].get("field").is_none());
    }

    #[tokio::test]
    async fn illegal_state_returns_409() {
        let err: ApiError = ConversationError::IllegalState("append a user turn").into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = json_of(response).await;
        assert_eq!(json["error"]["code"], "ILLEGAL_STATE");
    }

    #[tokio::test]
    async fn validation_returns_422_with_field() {
        let err: ApiError =
            DispatchError::Validation(ValidationError::new("Age", "must be zero or greater")).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = json_of(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_FAILED");
        assert_eq!(json["error"]["field"], "Age");
        assert_eq!(json["error"]["message"], "Age must be zero or greater");
    }

    #[tokio::test]
    async fn invalid_body_keeps_status_with_json_body() {
        let err = ApiError::InvalidBody {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "missing field `text`".into(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = json_of(response).await;
        assert_eq!(json["error"]["code"], "INVALID_BODY");
        assert_eq!(json["error"]["message"], "missing field `text`");
    }

    #[tokio::test]
    async fn not_found_returns_404() {
        let response = ApiError::NotFound("Session not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn internal_returns_500() {
        let response = ApiError::Internal("something broke".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_of(response).await;
        // Internal errors hide details from client
        assert_eq!(json["error"]["message"], "An internal error occurred");
    }
}
