//! Session domain model.
//!
//! A session is one respondent's run through a bound survey version.
//! The survey snapshot is bound by value at creation, so a later
//! publish never affects an in-flight respondent.

use crate::survey::SurveyVersion;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// The respondent still has questions to answer.
    Active,
    /// All questions answered; the session is immutable (terminal).
    Completed,
}

/// The durable result of one answered question.
///
/// The prompt is denormalized at answer time so later survey edits
/// cannot retroactively alter historical records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// Id of the answered question within the bound survey version.
    pub question_id: u32,
    /// Snapshot of the question prompt at answer time.
    pub question_text: String,
    /// Verbatim respondent text.
    pub original_answer: String,
    /// Option codes chosen by the interpreter, in option declaration
    /// order. Empty when the answer was uncodeable or the question is
    /// open-ended.
    pub answer_codes: Vec<String>,
    /// Timestamp when the answer was recorded (RFC 3339).
    pub timestamp: String,
}

/// Represents one respondent's progress through a survey.
///
/// Invariant: `answers.len() == current_question_index` while the
/// session is active, and `answers.len() == survey.questions.len()`
/// once completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID format), immutable.
    pub session_id: String,
    /// The survey version snapshot bound at creation.
    pub survey: SurveyVersion,
    /// 0-based pointer into the bound survey's question sequence.
    pub current_question_index: usize,
    /// Answer records in question-progression order.
    pub answers: Vec<AnswerRecord>,
    /// Lifecycle state.
    pub status: SessionStatus,
    /// Timestamp when the session was created (RFC 3339).
    pub started_at: String,
    /// Timestamp of the last answer (or creation) (RFC 3339).
    pub last_activity_at: String,
}

impl Session {
    /// Creates a new active session bound to the given survey snapshot.
    pub fn new(survey: SurveyVersion) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            session_id: Uuid::new_v4().to_string(),
            survey,
            current_question_index: 0,
            answers: Vec::new(),
            status: SessionStatus::Active,
            started_at: now.clone(),
            last_activity_at: now,
        }
    }

    /// Returns true once every question has been answered.
    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }
}
