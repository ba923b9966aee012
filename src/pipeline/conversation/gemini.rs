use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::prompt::SYSTEM_PROMPT;
use super::{BackendError, ReplyBackend};
use crate::config::AppConfig;
use crate::models::enums::MessageRole;
use crate::models::Message;

/// Upper bound on a single generation request.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Blocking client for the Gemini `generateContent` REST endpoint.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self, BackendError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| BackendError::ClientSetup(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, BackendError> {
        Self::new(
            &config.gemini_base_url,
            &config.api_key,
            &config.model,
            DEFAULT_TIMEOUT_SECS,
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

/// Request body for `models/{model}:generateContent`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> Content<'a> {
    fn text(role: Option<&'static str>, text: &'a str) -> Self {
        Self {
            role,
            parts: vec![Part { text }],
        }
    }
}

/// Response body from `generateContent`
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

fn gemini_role(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "user",
        MessageRole::Assistant => "model",
    }
}

/// Turns must alternate between "user" and "model", so consecutive turns of
/// the same role (a risk question left unanswered, a failed reply) are sent
/// as one content with several parts.
fn push_turn<'a>(contents: &mut Vec<Content<'a>>, role: &'static str, text: &'a str) {
    match contents.last_mut() {
        Some(last) if last.role == Some(role) => last.parts.push(Part { text }),
        _ => contents.push(Content::text(Some(role), text)),
    }
}

fn build_request<'a>(history: &'a [Message], new_text: &'a str) -> GenerateContentRequest<'a> {
    let mut contents: Vec<Content<'a>> = Vec::with_capacity(history.len() + 1);
    for message in history {
        push_turn(&mut contents, gemini_role(message.role), &message.text);
    }
    push_turn(&mut contents, "user", new_text);

    GenerateContentRequest {
        system_instruction: Content::text(None, SYSTEM_PROMPT),
        contents,
    }
}

fn extract_reply(parsed: GenerateContentResponse) -> Result<String, BackendError> {
    let Some(candidate) = parsed.candidates.into_iter().next() else {
        let reason = parsed
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates".to_string());
        return Err(BackendError::MalformedResponse(format!(
            "no reply generated ({reason})"
        )));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate
            .finish_reason
            .unwrap_or_else(|| "empty content".to_string());
        return Err(BackendError::MalformedResponse(format!(
            "candidate has no text ({reason})"
        )));
    }

    Ok(text)
}

impl ReplyBackend for GeminiClient {
    fn generate_reply(&self, history: &[Message], new_text: &str) -> Result<String, BackendError> {
        let body = build_request(history, new_text);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    BackendError::Unreachable(format!(
                        "request timed out after {}s",
                        self.timeout_secs
                    ))
                } else if e.is_connect() {
                    BackendError::Unreachable(format!("cannot connect to {}", self.base_url))
                } else {
                    BackendError::Unreachable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::warn!(status = status.as_u16(), model = %self.model, "Gemini request failed");
            return Err(match status.as_u16() {
                401 | 403 => BackendError::Auth {
                    status: status.as_u16(),
                    body,
                },
                429 => BackendError::Quota { body },
                code => BackendError::Status { status: code, body },
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;

        extract_reply(parsed)
    }
}
