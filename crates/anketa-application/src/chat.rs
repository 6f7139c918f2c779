//! Respondent-facing chat use case.
//!
//! Creates sessions against the current survey snapshot and routes
//! inbound messages through the session registry.

use anketa_core::error::{AnketaError, Result};
use anketa_core::session::SessionRegistry;
use anketa_core::survey::{Question, SurveyStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Response to `create session`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartChatResponse {
    pub session_id: String,
    /// Welcome message embedding the first question.
    pub message: String,
    pub current_question: Question,
}

/// Response to `submit message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
    /// The question awaiting an answer, absent once completed.
    pub current_question: Option<Question>,
    pub is_completed: bool,
}

/// Drives one respondent's conversation.
pub struct ChatService {
    registry: Arc<SessionRegistry>,
    store: Arc<SurveyStore>,
}

impl ChatService {
    pub fn new(registry: Arc<SessionRegistry>, store: Arc<SurveyStore>) -> Self {
        Self { registry, store }
    }

    /// Starts a new survey session bound to the current survey snapshot.
    ///
    /// The snapshot is frozen at session start: a survey published
    /// afterwards does not affect this respondent.
    pub async fn start_chat(&self) -> Result<StartChatResponse> {
        let survey = self.store.get_current().await;
        let session = self.registry.create_session((*survey).clone()).await?;

        // Published surveys are validated non-empty, but a hand-edited
        // current.json can reach us without questions. Refuse to start
        // rather than panic.
        let first_question = session.survey.questions.first().cloned().ok_or_else(|| {
            AnketaError::internal(format!(
                "survey version {} has no questions",
                session.survey.key
            ))
        })?;
        let message = format!(
            "Добрый день! Я бот для проведения социологического опроса.\n\n\
             Сейчас я задам вам несколько вопросов. Вы можете отвечать своими словами, \
             а я постараюсь понять ваш ответ.\n\nНачнём! {}",
            first_question.prompt
        );

        tracing::debug!(session_id = %session.session_id, survey_key = %session.survey.key, "chat started");
        Ok(StartChatResponse {
            session_id: session.session_id,
            message,
            current_question: first_question,
        })
    }

    /// Records one respondent message.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown session id
    /// - `InvalidState` if the session is already completed
    /// - `EmptyInput` for a blank message
    pub async fn submit_message(&self, session_id: &str, message: &str) -> Result<ChatResponse> {
        let outcome = self.registry.submit_message(session_id, message).await?;
        Ok(ChatResponse {
            message: outcome.message,
            current_question: outcome.next_question,
            is_completed: outcome.is_completed,
        })
    }
}
