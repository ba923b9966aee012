//! Shared state for the chat API router.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::api::error::ApiError;
use crate::config;
use crate::pipeline::conversation::{ConversationSession, ReplyBackend};
use crate::pipeline::prediction::RiskPredictor;

/// One session behind its own lock. The lock is held for a whole unit of
/// work (append, backend call, append), so a session handles one input at a
/// time.
pub type SharedSession = Arc<Mutex<ConversationSession>>;

// ═══════════════════════════════════════════════════════════
// API context: shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub sessions: Arc<SessionRegistry>,
    pub backend: Arc<dyn ReplyBackend>,
    pub predictor: Arc<dyn RiskPredictor>,
    /// Language model name, reported by the health check.
    pub model: Arc<str>,
}

impl ApiContext {
    pub fn new(
        backend: Arc<dyn ReplyBackend>,
        predictor: Arc<dyn RiskPredictor>,
        model: &str,
    ) -> Self {
        Self {
            sessions: Arc::new(SessionRegistry::default()),
            backend,
            predictor,
            model: Arc::from(model),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Session registry
// ═══════════════════════════════════════════════════════════

struct SessionEntry {
    session: SharedSession,
    last_used: Instant,
}

/// Maps session handles to sessions. Holds no conversation state itself.
///
/// Sessions idle longer than `ttl` are dropped; when `max_sessions` are live,
/// creating another evicts the least recently used one.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    ttl: Duration,
    max_sessions: usize,
}

impl SessionRegistry {
    pub fn new(ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Create an initialized session and register it under its own id.
    pub fn create(&self) -> Result<(Uuid, SharedSession), ApiError> {
        let session = ConversationSession::initialize();
        let id = session.id();
        let shared = Arc::new(Mutex::new(session));

        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| ApiError::Internal("session registry lock poisoned".into()))?;

        let now = Instant::now();
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_used) < self.ttl);

        while sessions.len() >= self.max_sessions {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(id, _)| *id)
            else {
                break;
            };
            sessions.remove(&oldest);
        }

        let dropped = before - sessions.len();
        if dropped > 0 {
            tracing::debug!(dropped, "Pruned idle sessions");
        }

        sessions.insert(
            id,
            SessionEntry {
                session: shared.clone(),
                last_used: now,
            },
        );

        tracing::info!(session_id = %id, live = sessions.len(), "Session created");
        Ok((id, shared))
    }

    /// Look up a session and mark it as used. Expired sessions are removed
    /// and reported as not found.
    pub fn get(&self, id: Uuid) -> Result<SharedSession, ApiError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| ApiError::Internal("session registry lock poisoned".into()))?;

        let now = Instant::now();
        match sessions.get_mut(&id) {
            Some(entry) if now.duration_since(entry.last_used) < self.ttl => {
                entry.last_used = now;
                Ok(entry.session.clone())
            }
            Some(_) => {
                sessions.remove(&id);
                tracing::debug!(session_id = %id, "Session expired");
                Err(ApiError::NotFound(format!("Session {id} not found")))
            }
            None => Err(ApiError::NotFound(format!("Session {id} not found"))),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(config::SESSION_IDLE_TTL_SECS),
            config::MAX_SESSIONS,
        )
    }
}
