//! Survey question and version models.
//!
//! A [`SurveyVersion`] is an immutable ordered question set. Sessions bind
//! to a version by value at creation, so publishing a new version never
//! affects a respondent mid-survey.

use serde::{Deserialize, Serialize};

/// How a question's answer is coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Exactly one option code is expected.
    SingleChoice,
    /// Any number of option codes may apply.
    MultiChoice,
    /// Free text; the answer is never coded.
    Open,
}

impl QuestionType {
    /// Returns true for question types that carry an option set.
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::SingleChoice | Self::MultiChoice)
    }
}

/// One selectable option of a choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Controlled response code (unique within the question).
    pub code: String,
    /// Human-readable option text shown to the respondent.
    pub text: String,
}

/// A single survey question.
///
/// Immutable once part of a published survey version. The `id` is unique
/// within a version and question ids are strictly increasing in stored
/// order, which defines progression order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Question unique ID within its survey version.
    pub id: u32,
    /// Answer coding mode.
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Question text shown to the respondent.
    pub prompt: String,
    /// Ordered option set; empty for `Open` questions.
    #[serde(default)]
    pub options: Vec<AnswerOption>,
}

/// An immutable, ordered, versioned question set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyVersion {
    /// Filename-safe version key, generated at publish time.
    pub key: String,
    /// Timestamp when the version was published (RFC 3339).
    pub created_at: String,
    /// Ordered question sequence (non-empty).
    pub questions: Vec<Question>,
}

impl SurveyVersion {
    /// The built-in questionnaire served until a survey is first published.
    pub fn builtin_default() -> Self {
        Self {
            key: "survey_builtin".to_string(),
            created_at: "1970-01-01T00:00:00+00:00".to_string(),
            questions: vec![
                Question {
                    id: 1,
                    question_type: QuestionType::SingleChoice,
                    prompt: "Ваш пол?".to_string(),
                    options: vec![
                        AnswerOption {
                            code: "M".to_string(),
                            text: "Мужской".to_string(),
                        },
                        AnswerOption {
                            code: "F".to_string(),
                            text: "Женский".to_string(),
                        },
                    ],
                },
                Question {
                    id: 2,
                    question_type: QuestionType::MultiChoice,
                    prompt: "Какие напитки вы пьёте по утрам?".to_string(),
                    options: vec![
                        AnswerOption {
                            code: "A".to_string(),
                            text: "Кофе".to_string(),
                        },
                        AnswerOption {
                            code: "B".to_string(),
                            text: "Чай".to_string(),
                        },
                        AnswerOption {
                            code: "C".to_string(),
                            text: "Вода".to_string(),
                        },
                    ],
                },
                Question {
                    id: 3,
                    question_type: QuestionType::Open,
                    prompt: "Есть ли у вас пожелания к опросу?".to_string(),
                    options: vec![],
                },
            ],
        }
    }
}

/// A retired survey version retained for audit/reload.
///
/// The full question set lives in the archive storage; the entry itself
/// carries only a derived summary so the archive list stays cheap to scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    /// Opaque retrieval key of the archived version.
    pub key: String,
    /// Timestamp when the version was replaced (RFC 3339).
    pub archived_at: String,
    /// Number of questions in the archived version.
    pub question_count: usize,
    /// Prompt of the archived version's first question.
    pub first_question_text: String,
}
