use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::prompt::GREETING;
use super::{BackendError, ConversationError, ReplyBackend};
use crate::models::enums::MessageRole;
use crate::models::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Uninitialized,
    Active,
}

/// Ordered, append-only chat history for one user.
///
/// Starts `Uninitialized`; `activate` seeds the greeting and moves it to
/// `Active` exactly once. Every other operation requires `Active`.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    id: Uuid,
    state: SessionState,
    history: Vec<Message>,
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::uninitialized()
    }
}

impl ConversationSession {
    /// A session that has not been started yet.
    pub fn uninitialized() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::Uninitialized,
            history: Vec::new(),
        }
    }

    /// A started session whose history holds only the greeting.
    pub fn initialize() -> Self {
        let mut session = Self::uninitialized();
        session.seed();
        session
    }

    /// Move an uninitialized session to `Active`.
    pub fn activate(&mut self) -> Result<(), ConversationError> {
        if self.state == SessionState::Active {
            return Err(ConversationError::IllegalState("activate an already active session"));
        }
        self.seed();
        Ok(())
    }

    fn seed(&mut self) {
        self.history.push(Message::assistant(GREETING));
        self.state = SessionState::Active;
        tracing::debug!(session_id = %self.id, "Conversation session started");
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn append_user_turn(&mut self, text: &str) -> Result<&Message, ConversationError> {
        self.append(MessageRole::User, text, "append a user turn")
    }

    pub fn append_assistant_turn(&mut self, text: &str) -> Result<&Message, ConversationError> {
        self.append(MessageRole::Assistant, text, "append an assistant turn")
    }

    fn append(
        &mut self,
        role: MessageRole,
        text: &str,
        operation: &'static str,
    ) -> Result<&Message, ConversationError> {
        self.ensure_active(operation)?;

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ConversationError::EmptyInput);
        }

        self.history.push(Message::new(role, trimmed));
        tracing::debug!(
            session_id = %self.id,
            role = role.as_str(),
            chars = trimmed.chars().count(),
            turns = self.history.len(),
            "Appended turn"
        );

        Ok(&self.history[self.history.len() - 1])
    }

    /// Ask the backend for a reply to `user_text`, given the prior history.
    ///
    /// When the newest turn is this same user message (the dispatcher appends
    /// before asking), it is left out of the history so it is sent once.
    /// Nothing is appended here; the caller decides what to do with the reply.
    pub fn request_generic_reply<B>(
        &self,
        backend: &B,
        user_text: &str,
    ) -> Result<String, ConversationError>
    where
        B: ReplyBackend + ?Sized,
    {
        self.ensure_active("request a reply")?;

        let text = user_text.trim();
        if text.is_empty() {
            return Err(ConversationError::EmptyInput);
        }

        let prior = match self.history.split_last() {
            Some((last, rest)) if last.role == MessageRole::User && last.text == text => rest,
            _ => &self.history[..],
        };

        let reply = backend.generate_reply(prior, text)?;
        if reply.trim().is_empty() {
            return Err(BackendError::MalformedResponse("empty reply".into()).into());
        }
        Ok(reply)
    }

    fn ensure_active(&self, operation: &'static str) -> Result<(), ConversationError> {
        if self.state != SessionState::Active {
            return Err(ConversationError::IllegalState(operation));
        }
        Ok(())
    }
}
