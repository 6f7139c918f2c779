//! Aggregation and export over persisted sessions.
//!
//! Pure read-side computation: every function takes the persisted
//! session records as input and performs no mutation. Exports are
//! deterministic for a given input ordering.

use crate::error::Result;
use crate::session::{AnswerRecord, Session, SessionStatus};
use serde::{Deserialize, Serialize};

/// Summary of one recently active session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentResponse {
    pub session_id: String,
    pub answers_count: usize,
    pub started_at: String,
    /// Verbatim text of the most recent answer, if any.
    pub last_answer: Option<String>,
}

/// Dashboard statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Count of all sessions ever created.
    pub total_sessions: usize,
    /// Count of completed sessions.
    pub completed_surveys: usize,
    /// Count of still-active sessions.
    pub active_sessions: usize,
    /// The most recently active sessions, newest first.
    pub recent_responses: Vec<RecentResponse>,
}

/// One session's answers as shown on the responses page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseView {
    pub session_id: String,
    /// Last activity timestamp (RFC 3339).
    pub timestamp: String,
    pub status: SessionStatus,
    pub answers: Vec<AnswerRecord>,
}

/// Lossless dump of every session, suitable for re-import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub sessions: Vec<Session>,
}

/// Delimiter joining multiple answer codes inside one CSV cell.
const CODE_DELIMITER: &str = ";";

/// Computes dashboard statistics over all persisted sessions.
///
/// `sessions` is expected most-recently-active first, as returned by
/// the registry; `recent_limit` bounds `recent_responses`.
pub fn compute_stats(sessions: &[Session], recent_limit: usize) -> Stats {
    let completed_surveys = sessions.iter().filter(|s| s.is_completed()).count();

    let recent_responses = sessions
        .iter()
        .take(recent_limit)
        .map(|session| RecentResponse {
            session_id: session.session_id.clone(),
            answers_count: session.answers.len(),
            started_at: session.started_at.clone(),
            last_answer: session
                .answers
                .last()
                .map(|record| record.original_answer.clone()),
        })
        .collect();

    Stats {
        total_sessions: sessions.len(),
        completed_surveys,
        active_sessions: sessions.len() - completed_surveys,
        recent_responses,
    }
}

/// Builds one response view per session, most recently active first.
pub fn list_all_responses(sessions: &[Session]) -> Vec<ResponseView> {
    sessions
        .iter()
        .map(|session| ResponseView {
            session_id: session.session_id.clone(),
            timestamp: session.last_activity_at.clone(),
            status: session.status,
            answers: session.answers.clone(),
        })
        .collect()
}

/// Renders all answers as CSV, one row per `(session, answer)` pair.
///
/// Column order is fixed: `session_id, question, original_answer,
/// answer_codes, timestamp`. Joined codes are separated by `;`;
/// embedded delimiters and quotes are escaped per standard CSV quoting.
pub fn export_csv(sessions: &[Session]) -> Vec<u8> {
    let mut out = String::from("session_id,question,original_answer,answer_codes,timestamp\n");

    for session in sessions {
        for record in &session.answers {
            let joined_codes = record.answer_codes.join(CODE_DELIMITER);
            let row = [
                session.session_id.as_str(),
                record.question_text.as_str(),
                record.original_answer.as_str(),
                joined_codes.as_str(),
                record.timestamp.as_str(),
            ]
            .map(csv_field)
            .join(",");
            out.push_str(&row);
            out.push('\n');
        }
    }

    out.into_bytes()
}

/// Serializes every session, losslessly, as pretty-printed JSON.
pub fn export_json(sessions: &[Session]) -> Result<Vec<u8>> {
    let document = ExportDocument {
        sessions: sessions.to_vec(),
    };
    Ok(serde_json::to_vec_pretty(&document)?)
}

/// Quotes a CSV field when it embeds a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::KeywordInterpreter;
    use crate::survey::SurveyVersion;

    fn answered_session(answers: &[&str]) -> Session {
        let mut session = Session::new(SurveyVersion::builtin_default());
        let interpreter = KeywordInterpreter::new();
        for answer in answers {
            session.submit_answer(answer, &interpreter).unwrap();
        }
        session
    }

    #[test]
    fn test_stats_counts_by_status() {
        let sessions = vec![
            answered_session(&["мужской", "кофе", "всё отлично"]), // completed
            answered_session(&["женский"]),
            answered_session(&[]),
        ];

        let stats = compute_stats(&sessions, 10);
        assert_eq!(stats.total_sessions, 3);
        assert_eq!(stats.completed_surveys, 1);
        assert_eq!(stats.active_sessions, 2);
        assert_eq!(stats.recent_responses.len(), 3);
        assert_eq!(
            stats.recent_responses[0].last_answer.as_deref(),
            Some("всё отлично")
        );
        assert_eq!(stats.recent_responses[2].last_answer, None);
    }

    #[test]
    fn test_recent_responses_respect_limit() {
        let sessions = vec![
            answered_session(&["мужской"]),
            answered_session(&["женский"]),
            answered_session(&["мужской"]),
        ];
        let stats = compute_stats(&sessions, 2);
        assert_eq!(stats.recent_responses.len(), 2);
        assert_eq!(stats.recent_responses[0].session_id, sessions[0].session_id);
    }

    #[test]
    fn test_response_views_carry_full_answer_records() {
        let session = answered_session(&["мужской", "сок"]);
        let views = list_all_responses(std::slice::from_ref(&session));

        assert_eq!(views.len(), 1);
        assert_eq!(views[0].session_id, session.session_id);
        assert_eq!(views[0].timestamp, session.last_activity_at);
        assert_eq!(views[0].answers.len(), 2);
        assert_eq!(views[0].answers[1].original_answer, "сок");
        assert!(views[0].answers[1].answer_codes.is_empty());
    }

    #[test]
    fn test_csv_has_one_row_per_answer() {
        let sessions = vec![answered_session(&["мужской", "кофе и чай"])];
        let csv = String::from_utf8(export_csv(&sessions)).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "session_id,question,original_answer,answer_codes,timestamp"
        );
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("Ваш пол?"));
        assert!(lines[1].contains(",M,"));
        assert!(lines[2].contains("A;B"));
    }

    #[test]
    fn test_csv_escapes_embedded_delimiters_and_quotes() {
        let mut session = answered_session(&[]);
        session
            .submit_answer("мужской, наверное \"да\"", &KeywordInterpreter::new())
            .unwrap();

        let csv = String::from_utf8(export_csv(std::slice::from_ref(&session))).unwrap();
        assert!(csv.contains("\"мужской, наверное \"\"да\"\"\""));
    }

    #[test]
    fn test_json_export_round_trips_counts() {
        let sessions = vec![
            answered_session(&["мужской", "кофе", "ничего"]),
            answered_session(&["женский"]),
        ];

        let bytes = export_json(&sessions).unwrap();
        let parsed: ExportDocument = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(parsed.sessions.len(), sessions.len());
        let stats_before = compute_stats(&sessions, 10);
        let stats_after = compute_stats(&parsed.sessions, 10);
        assert_eq!(stats_before, stats_after);

        let views_before = list_all_responses(&sessions);
        let views_after = list_all_responses(&parsed.sessions);
        assert_eq!(views_before, views_after);
    }
}
