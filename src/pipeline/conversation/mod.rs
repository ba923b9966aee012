pub mod prompt;
pub mod session;
pub mod gemini;

pub use gemini::GeminiClient;
pub use session::*;

use thiserror::Error;

use crate::models::Message;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Language model backend unreachable: {0}")]
    Unreachable(String),

    #[error("Language model rejected the credential (status {status}): {body}")]
    Auth { status: u16, body: String },

    #[error("Language model quota exhausted: {body}")]
    Quota { body: String },

    #[error("Language model returned error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("Malformed language model response: {0}")]
    MalformedResponse(String),

    #[error("HTTP client error: {0}")]
    ClientSetup(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversationError {
    #[error("Message cannot be empty")]
    EmptyInput,

    #[error("Session is not active (cannot {0})")]
    IllegalState(&'static str),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Language-model backend abstraction (allows mocking).
pub trait ReplyBackend: Send + Sync {
    /// Produce the assistant reply to `new_text` given the prior turns.
    fn generate_reply(&self, history: &[Message], new_text: &str) -> Result<String, BackendError>;
}

/// Mock backend for testing: returns a fixed reply and records each request.
#[cfg(test)]
pub(crate) struct MockBackend {
    reply: Result<String, BackendError>,
    requests: std::sync::Mutex<Vec<(Vec<Message>, String)>>,
}

#[cfg(test)]
impl MockBackend {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            requests: Default::default(),
        }
    }

    pub fn failing(error: BackendError) -> Self {
        Self {
            reply: Err(error),
            requests: Default::default(),
        }
    }

    pub fn requests(&self) -> Vec<(Vec<Message>, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl ReplyBackend for MockBackend {
    fn generate_reply(&self, history: &[Message], new_text: &str) -> Result<String, BackendError> {
        self.requests
            .lock()
            .unwrap()
            .push((history.to_vec(), new_text.to_string()));
        self.reply.clone()
    }
}
