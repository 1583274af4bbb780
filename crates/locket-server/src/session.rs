use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde_json::{Map, Value};
use uuid::Uuid;

use locket_core::scores::HighScores;
use locket_core::selection::SelectionState;

use crate::error::AppError;

/// Header carrying the session id issued by `POST /api/v1/sessions`.
pub const SESSION_HEADER: &str = "x-locket-session";

/// Everything one player has chosen or changed. Lives in memory only.
#[derive(Debug)]
pub struct Session {
    pub selection: SelectionState,
    /// Tuned parameters per game slug. Never written back to disk.
    pub tuned: HashMap<String, Map<String, Value>>,
    pub scores: HighScores,
    last_activity: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            selection: SelectionState::new(),
            tuned: HashMap::new(),
            scores: HighScores::new(),
            last_activity: Instant::now(),
        }
    }
}

/// Manages all live sessions.
pub struct SessionStore {
    sessions: HashMap<String, Session>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            idle_timeout,
            max_sessions,
        }
    }

    /// Create a session, first dropping idle ones. Returns `None` at capacity.
    pub fn create(&mut self) -> Option<String> {
        let removed = self.cleanup_idle_sessions(self.idle_timeout);
        if removed > 0 {
            tracing::debug!(removed, "Pruned idle sessions");
        }
        if self.sessions.len() >= self.max_sessions {
            tracing::warn!(max = self.max_sessions, "Session limit reached");
            return None;
        }
        let id = Uuid::new_v4().to_string();
        self.sessions.insert(id.clone(), Session::new());
        tracing::info!(session = %id, "Session created");
        Some(id)
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.get(id)
    }

    /// Mutable access; counts as activity.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Session> {
        let session = self.sessions.get_mut(id)?;
        session.last_activity = Instant::now();
        Some(session)
    }

    /// Remove sessions idle for longer than `max_idle`.
    /// Returns the number of sessions removed.
    pub fn cleanup_idle_sessions(&mut self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let before = self.sessions.len();
        self.sessions
            .retain(|_, s| now.duration_since(s.last_activity) < max_idle);
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Session id taken from the `x-locket-session` header.
#[derive(Debug, Clone)]
pub struct SessionId(pub String);

impl<S: Send + Sync> FromRequestParts<S> for SessionId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::BadRequest(format!("missing {SESSION_HEADER} header")))?;
        Ok(Self(value.to_string()))
    }
}
