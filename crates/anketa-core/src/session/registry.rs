//! Process-wide session registry.
//!
//! Holds every live session behind its own `Mutex` so two concurrent
//! submits on the same session never interleave, while operations on
//! distinct sessions proceed in parallel. Every mutation is persisted
//! through the [`SessionRepository`] before the per-session lock is
//! released.

use super::engine::SubmitOutcome;
use super::model::Session;
use super::repository::SessionRepository;
use crate::error::{AnketaError, Result};
use crate::interpreter::AnswerInterpreter;
use crate::survey::SurveyVersion;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Process-wide store of respondent sessions.
pub struct SessionRegistry {
    /// In-memory session map, each entry guarded independently.
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
    /// Persistent storage backend for session data.
    repository: Arc<dyn SessionRepository>,
    /// Strategy for mapping free text to option codes.
    interpreter: Arc<dyn AnswerInterpreter>,
}

impl SessionRegistry {
    /// Creates a new `SessionRegistry`.
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        interpreter: Arc<dyn AnswerInterpreter>,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            repository,
            interpreter,
        }
    }

    /// Creates a new session bound to the given survey snapshot,
    /// persists it, and returns a copy of its initial state.
    pub async fn create_session(&self, survey: SurveyVersion) -> Result<Session> {
        let session = Session::new(survey);
        self.repository.save(&session).await?;
        tracing::info!(session_id = %session.session_id, "created session");

        let mut sessions = self.sessions.write().await;
        sessions.insert(
            session.session_id.clone(),
            Arc::new(Mutex::new(session.clone())),
        );

        Ok(session)
    }

    /// Records one respondent message against a session.
    ///
    /// The per-session lock is held across the state transition and the
    /// persistence write, so concurrent submits on the same session are
    /// fully serialized.
    ///
    /// # Errors
    ///
    /// - `AnketaError::NotFound` for an unknown session id
    /// - errors propagated from `Session::submit_answer`
    pub async fn submit_message(&self, session_id: &str, raw_text: &str) -> Result<SubmitOutcome> {
        let entry = self.entry(session_id).await?;

        let mut session = entry.lock().await;
        // The transition runs on a scratch copy and is written back only
        // after the persist succeeds, so a failed save leaves the shared
        // session exactly where the caller last saw it and a retry lands
        // on the same question.
        let mut updated = session.clone();
        let outcome = updated.submit_answer(raw_text, self.interpreter.as_ref())?;
        self.repository.save(&updated).await?;
        *session = updated;

        Ok(outcome)
    }

    /// Returns a snapshot of a session's current state.
    pub async fn get_session(&self, session_id: &str) -> Result<Session> {
        let entry = self.entry(session_id).await?;
        let session = entry.lock().await;
        Ok(session.clone())
    }

    /// Lists all persisted sessions, most recently active first.
    ///
    /// This is the read surface the aggregator works from; it performs
    /// no mutation.
    pub async fn list_sessions(&self) -> Result<Vec<Session>> {
        self.repository.list_all().await
    }

    /// Evicts in-memory entries for active sessions idle longer than
    /// `idle_for`. Persisted session documents are untouched; an evicted
    /// session is re-hydrated from the repository on next access.
    ///
    /// Returns the number of evicted entries. Entries currently locked
    /// by an in-flight submit are skipped.
    pub async fn purge_idle(&self, idle_for: Duration) -> usize {
        let cutoff = (Utc::now() - idle_for).to_rfc3339();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| match entry.try_lock() {
            Ok(session) => session.last_activity_at >= cutoff,
            Err(_) => true,
        });
        let purged = before - sessions.len();
        if purged > 0 {
            tracing::debug!(purged, "evicted idle sessions from registry");
        }
        purged
    }

    /// Looks up a session entry, re-hydrating it from the repository if
    /// it is not in memory.
    async fn entry(&self, session_id: &str) -> Result<Arc<Mutex<Session>>> {
        {
            let sessions = self.sessions.read().await;
            if let Some(entry) = sessions.get(session_id) {
                return Ok(entry.clone());
            }
        }

        let session = self
            .repository
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| AnketaError::not_found("session", session_id))?;

        let mut sessions = self.sessions.write().await;
        // Another task may have re-hydrated the same session meanwhile;
        // keep the existing entry so both callers share one lock.
        let entry = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(session)))
            .clone();
        Ok(entry)
    }
}
