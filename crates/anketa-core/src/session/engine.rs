//! Session state machine.
//!
//! One transition: feed the respondent's raw text and the current
//! question into the interpreter, record the result, advance or
//! complete. Reply texts are deterministic templates; the clarifying
//! acknowledgment for an uncodeable choice answer is distinct from the
//! normal one, but the answer is recorded either way.

use super::model::{AnswerRecord, Session, SessionStatus};
use crate::error::{AnketaError, Result};
use crate::interpreter::AnswerInterpreter;
use crate::survey::Question;
use chrono::Utc;

/// Result of one `submit_answer` transition.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    /// Human-readable bot reply.
    pub message: String,
    /// The next question, or `None` if the session just completed.
    pub next_question: Option<Question>,
    /// Whether the session is now completed.
    pub is_completed: bool,
    /// Codes the interpreter matched for the submitted answer.
    pub matched_codes: Vec<String>,
}

impl Session {
    /// Returns the question awaiting an answer, `None` iff completed.
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_completed() {
            return None;
        }
        self.survey.questions.get(self.current_question_index)
    }

    /// Records one respondent message and advances the session.
    ///
    /// # Errors
    ///
    /// - `AnketaError::InvalidState` if the session is already completed
    /// - `AnketaError::EmptyInput` if `raw_text` trims to empty
    pub fn submit_answer(
        &mut self,
        raw_text: &str,
        interpreter: &dyn AnswerInterpreter,
    ) -> Result<SubmitOutcome> {
        if self.is_completed() {
            return Err(AnketaError::invalid_state(format!(
                "session {} is already completed",
                self.session_id
            )));
        }
        if raw_text.trim().is_empty() {
            return Err(AnketaError::EmptyInput);
        }

        let question = self
            .survey
            .questions
            .get(self.current_question_index)
            .cloned()
            .ok_or_else(|| {
                AnketaError::internal(format!(
                    "active session {} points past its question list",
                    self.session_id
                ))
            })?;

        let matched_codes = interpreter.interpret(&question, raw_text);
        let now = Utc::now().to_rfc3339();

        self.answers.push(AnswerRecord {
            question_id: question.id,
            question_text: question.prompt.clone(),
            original_answer: raw_text.to_string(),
            answer_codes: matched_codes.clone(),
            timestamp: now.clone(),
        });
        self.current_question_index += 1;
        self.last_activity_at = now;

        if self.current_question_index == self.survey.questions.len() {
            self.status = SessionStatus::Completed;
        }

        let next_question = self.current_question().cloned();
        let is_completed = self.is_completed();
        let uncodeable = question.question_type.is_choice() && matched_codes.is_empty();
        let message = compose_reply(next_question.as_ref(), self.answers.len(), uncodeable);

        Ok(SubmitOutcome {
            message,
            next_question,
            is_completed,
            matched_codes,
        })
    }
}

/// Composes the deterministic bot reply for one transition.
fn compose_reply(next_question: Option<&Question>, answered: usize, uncodeable: bool) -> String {
    let acknowledgment = if uncodeable {
        "Записал ваш ответ как есть, хотя он не совпал ни с одним из предложенных вариантов."
    } else {
        "Спасибо, записал ваш ответ!"
    };

    match next_question {
        Some(question) => format!("{}\n\n{}", acknowledgment, question.prompt),
        None => {
            let farewell = format!(
                "Спасибо за участие в опросе! Ваши ответы сохранены.\n\nВсего вопросов: {}",
                answered
            );
            if uncodeable {
                format!("{}\n\n{}", acknowledgment, farewell)
            } else {
                farewell
            }
        }
    }
}
