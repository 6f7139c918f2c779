//! Answer interpreter.
//!
//! Maps a respondent's free-text message to controlled option codes of
//! the active question. The rule-based [`KeywordInterpreter`] sits
//! behind the [`AnswerInterpreter`] trait so a future embedding- or
//! model-based matcher can replace it without touching the session
//! state machine.

use crate::survey::Question;

/// Strategy interface for mapping free text to option codes.
///
/// # Contract
///
/// - For `Open` questions the result is always empty.
/// - An empty result for a choice question is not an error: it signals
///   an uncodeable answer that the caller still records verbatim.
/// - Implementations must be deterministic: identical
///   `(question, raw_text)` pairs always yield identical results.
pub trait AnswerInterpreter: Send + Sync {
    /// Returns the matched option codes in option declaration order.
    ///
    /// `raw_text` is non-empty after trimming; the state machine rejects
    /// blank input before it reaches the interpreter.
    fn interpret(&self, question: &Question, raw_text: &str) -> Vec<String>;
}

/// Rule-based interpreter using case-insensitive exact and containment
/// matching.
///
/// Exact matches (against option text or code) take precedence; only
/// when no option matches exactly does containment matching apply
/// (option text appears as a phrase inside the answer, or vice versa).
/// Results follow option declaration order, and a single-choice
/// question keeps only the first match.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordInterpreter;

impl KeywordInterpreter {
    pub fn new() -> Self {
        Self
    }
}

impl AnswerInterpreter for KeywordInterpreter {
    fn interpret(&self, question: &Question, raw_text: &str) -> Vec<String> {
        if !question.question_type.is_choice() {
            return Vec::new();
        }

        let answer = raw_text.trim().to_lowercase();

        let exact: Vec<String> = question
            .options
            .iter()
            .filter(|opt| answer == opt.text.to_lowercase() || answer == opt.code.to_lowercase())
            .map(|opt| opt.code.clone())
            .collect();

        let mut matched = if exact.is_empty() {
            question
                .options
                .iter()
                .filter(|opt| {
                    let text = opt.text.to_lowercase();
                    answer.contains(&text) || text.contains(&answer)
                })
                .map(|opt| opt.code.clone())
                .collect()
        } else {
            exact
        };

        if question.question_type == crate::survey::QuestionType::SingleChoice {
            matched.truncate(1);
        }
        matched
    }
}
