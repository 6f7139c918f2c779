//! Administrator-facing use case.
//!
//! Survey publishing, version history, dashboard statistics, and data
//! export. Authorization mechanics (token issuance, header parsing)
//! belong to the outer collaborator; this service only requires the
//! resolved `authorized` precondition.

use anketa_core::error::{AnketaError, Result};
use anketa_core::report::{self, ResponseView, Stats};
use anketa_core::session::SessionRegistry;
use anketa_core::survey::{ArchiveEntry, Question, SurveyStore, SurveyVersion};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Response to `publish survey`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResponse {
    pub questions_count: usize,
    pub previous_version_saved: bool,
}

/// Administration surface over the store and registry.
pub struct AdminService {
    store: Arc<SurveyStore>,
    registry: Arc<SessionRegistry>,
    recent_responses_limit: usize,
}

impl AdminService {
    pub fn new(
        store: Arc<SurveyStore>,
        registry: Arc<SessionRegistry>,
        recent_responses_limit: usize,
    ) -> Self {
        Self {
            store,
            registry,
            recent_responses_limit,
        }
    }

    /// Returns the current survey version's question list.
    pub async fn current_survey(&self) -> SurveyVersion {
        (*self.store.get_current().await).clone()
    }

    /// Validates and publishes a new survey version.
    ///
    /// # Errors
    ///
    /// - `Security` when the requester is not authorized
    /// - `Validation` naming the first violated invariant
    pub async fn publish_survey(
        &self,
        authorized: bool,
        questions: Vec<Question>,
    ) -> Result<PublishResponse> {
        if !authorized {
            return Err(AnketaError::security(
                "publishing a survey requires administrator authorization",
            ));
        }

        let result = self.store.publish(questions).await?;
        Ok(PublishResponse {
            questions_count: result.questions_count,
            previous_version_saved: result.previous_version_saved,
        })
    }

    /// Lists archived version summaries, newest first.
    pub async fn list_versions(&self) -> Result<Vec<ArchiveEntry>> {
        self.store.list_versions().await
    }

    /// Loads one archived version by its retrieval key.
    pub async fn get_version(&self, key: &str) -> Result<SurveyVersion> {
        self.store.get_version(key).await
    }

    /// Computes dashboard statistics over all persisted sessions.
    pub async fn stats(&self) -> Result<Stats> {
        let sessions = self.registry.list_sessions().await?;
        Ok(report::compute_stats(&sessions, self.recent_responses_limit))
    }

    /// Lists every session's answers, most recently active first.
    pub async fn responses(&self) -> Result<Vec<ResponseView>> {
        let sessions = self.registry.list_sessions().await?;
        Ok(report::list_all_responses(&sessions))
    }

    /// Renders all answers as CSV bytes.
    pub async fn export_csv(&self) -> Result<Vec<u8>> {
        let sessions = self.registry.list_sessions().await?;
        Ok(report::export_csv(&sessions))
    }

    /// Renders a lossless JSON dump of all sessions.
    pub async fn export_json(&self) -> Result<Vec<u8>> {
        let sessions = self.registry.list_sessions().await?;
        report::export_json(&sessions)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::chat::ChatService;
    use anketa_core::interpreter::KeywordInterpreter;
    use anketa_core::session::{Session, SessionRepository};
    use anketa_core::survey::{AnswerOption, QuestionType, SurveyVersionRepository};
    use std::collections::HashMap;
    use std::sync::Mutex;

    // Mock SessionRepository shared by the application-level tests.
    struct MockSessionRepository {
        sessions: Mutex<HashMap<String, Session>>,
    }

    impl MockSessionRepository {
        fn new() -> Self {
            Self {
                sessions: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl SessionRepository for MockSessionRepository {
        async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>> {
            Ok(self.sessions.lock().unwrap().get(session_id).cloned())
        }

        async fn save(&self, session: &Session) -> Result<()> {
            self.sessions
                .lock()
                .unwrap()
                .insert(session.session_id.clone(), session.clone());
            Ok(())
        }

        async fn delete(&self, session_id: &str) -> Result<()> {
            self.sessions.lock().unwrap().remove(session_id);
            Ok(())
        }

        async fn list_all(&self) -> Result<Vec<Session>> {
            let mut sessions: Vec<Session> =
                self.sessions.lock().unwrap().values().cloned().collect();
            sessions.sort_by(|a, b| b.last_activity_at.cmp(&a.last_activity_at));
            Ok(sessions)
        }
    }

    // Mock SurveyVersionRepository shared by the application-level tests.
    struct MockSurveyRepository {
        current: Mutex<Option<SurveyVersion>>,
        archive: Mutex<Vec<(ArchiveEntry, SurveyVersion)>>,
    }

    impl MockSurveyRepository {
        fn new() -> Self {
            Self {
                current: Mutex::new(None),
                archive: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl SurveyVersionRepository for MockSurveyRepository {
        async fn load_current(&self) -> Result<Option<SurveyVersion>> {
            Ok(self.current.lock().unwrap().clone())
        }

        async fn save_current(&self, version: &SurveyVersion) -> Result<()> {
            *self.current.lock().unwrap() = Some(version.clone());
            Ok(())
        }

        async fn append_archive(
            &self,
            entry: &ArchiveEntry,
            version: &SurveyVersion,
        ) -> Result<()> {
            self.archive
                .lock()
                .unwrap()
                .push((entry.clone(), version.clone()));
            Ok(())
        }

        async fn list_archive(&self) -> Result<Vec<ArchiveEntry>> {
            let mut entries: Vec<ArchiveEntry> = self
                .archive
                .lock()
                .unwrap()
                .iter()
                .map(|(entry, _)| entry.clone())
                .collect();
            entries.sort_by(|a, b| b.archived_at.cmp(&a.archived_at));
            Ok(entries)
        }

        async fn load_archived(&self, key: &str) -> Result<Option<SurveyVersion>> {
            Ok(self
                .archive
                .lock()
                .unwrap()
                .iter()
                .find(|(entry, _)| entry.key == key)
                .map(|(_, version)| version.clone()))
        }
    }

    pub(crate) struct ServiceFixture {
        pub chat: ChatService,
        pub admin: AdminService,
    }

    pub(crate) async fn test_services() -> ServiceFixture {
        let store = Arc::new(
            SurveyStore::load(Arc::new(MockSurveyRepository::new()))
                .await
                .unwrap(),
        );
        let registry = Arc::new(SessionRegistry::new(
            Arc::new(MockSessionRepository::new()),
            Arc::new(KeywordInterpreter::new()),
        ));
        ServiceFixture {
            chat: ChatService::new(registry.clone(), store.clone()),
            admin: AdminService::new(store, registry, 10),
        }
    }

    pub(crate) fn one_question_survey() -> Vec<Question> {
        vec![Question {
            id: 1,
            question_type: QuestionType::SingleChoice,
            prompt: "Довольны ли вы сервисом?".to_string(),
            options: vec![
                AnswerOption {
                    code: "Y".to_string(),
                    text: "Да".to_string(),
                },
                AnswerOption {
                    code: "N".to_string(),
                    text: "Нет".to_string(),
                },
            ],
        }]
    }

    #[tokio::test]
    async fn test_unauthorized_publish_is_rejected() {
        let ServiceFixture { admin, .. } = test_services().await;
        let err = admin
            .publish_survey(false, one_question_survey())
            .await
            .unwrap_err();
        assert!(matches!(err, AnketaError::Security(_)));
        // The current survey is unchanged.
        assert_eq!(admin.current_survey().await.key, "survey_builtin");
    }

    #[tokio::test]
    async fn test_publish_and_version_history() {
        let ServiceFixture { admin, .. } = test_services().await;

        let first = admin
            .publish_survey(true, one_question_survey())
            .await
            .unwrap();
        assert_eq!(first.questions_count, 1);
        assert!(!first.previous_version_saved);

        let previous_key = admin.current_survey().await.key;
        let second = admin
            .publish_survey(true, one_question_survey())
            .await
            .unwrap();
        assert!(second.previous_version_saved);

        let versions = admin.list_versions().await.unwrap();
        assert_eq!(versions.len(), 1);
        let archived = admin.get_version(&versions[0].key).await.unwrap();
        assert_eq!(archived.key, previous_key);
    }

    #[tokio::test]
    async fn test_stats_over_live_sessions() {
        let ServiceFixture { chat, admin } = test_services().await;

        let completed = chat.start_chat().await.unwrap();
        chat.submit_message(&completed.session_id, "мужской")
            .await
            .unwrap();
        chat.submit_message(&completed.session_id, "кофе")
            .await
            .unwrap();
        chat.submit_message(&completed.session_id, "нет")
            .await
            .unwrap();

        let _active = chat.start_chat().await.unwrap();

        let stats = admin.stats().await.unwrap();
        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.completed_surveys, 1);
        assert_eq!(stats.active_sessions, 1);
        assert_eq!(stats.recent_responses.len(), 2);
    }

    #[tokio::test]
    async fn test_responses_expose_answer_records() {
        let ServiceFixture { chat, admin } = test_services().await;

        let started = chat.start_chat().await.unwrap();
        chat.submit_message(&started.session_id, "сок").await.unwrap();

        let responses = admin.responses().await.unwrap();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].answers[0].original_answer, "сок");
        assert!(responses[0].answers[0].answer_codes.is_empty());
    }

    #[tokio::test]
    async fn test_exports_agree_with_responses() {
        let ServiceFixture { chat, admin } = test_services().await;

        let started = chat.start_chat().await.unwrap();
        chat.submit_message(&started.session_id, "женский")
            .await
            .unwrap();

        let csv = String::from_utf8(admin.export_csv().await.unwrap()).unwrap();
        assert!(csv.lines().count() == 2); // header + one answer
        assert!(csv.contains("Ваш пол?"));

        let json = admin.export_json().await.unwrap();
        let parsed: anketa_core::report::ExportDocument =
            serde_json::from_slice(&json).unwrap();
        assert_eq!(parsed.sessions.len(), 1);
        assert_eq!(parsed.sessions[0].answers.len(), 1);
        assert_eq!(parsed.sessions[0].answers[0].answer_codes, vec!["F".to_string()]);
    }
}
