//! JSON-file-backed SessionRepository implementation.
//!
//! One document per session under `sessions/`, written atomically so a
//! crash mid-save never leaves a torn record.

use crate::atomic_json;
use anketa_core::error::Result;
use anketa_core::session::{Session, SessionRepository};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Directory-per-entity session repository.
///
/// Session ids are UUIDs, so they are used directly as file names.
pub struct JsonSessionRepository {
    sessions_dir: PathBuf,
}

impl JsonSessionRepository {
    /// Creates a repository rooted at `base_dir`, creating the
    /// `sessions/` directory if needed.
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let sessions_dir = crate::paths::AnketaPaths::sessions_dir(base_dir.as_ref());
        fs::create_dir_all(&sessions_dir).await?;
        Ok(Self { sessions_dir })
    }

    fn session_path(&self, session_id: &str) -> PathBuf {
        self.sessions_dir.join(format!("{}.json", session_id))
    }
}

#[async_trait]
impl SessionRepository for JsonSessionRepository {
    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>> {
        atomic_json::read_json(&self.session_path(session_id)).await
    }

    async fn save(&self, session: &Session) -> Result<()> {
        atomic_json::write_json(&self.session_path(&session.session_id), session).await
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        match fs::remove_file(self.session_path(session_id)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    async fn list_all(&self) -> Result<Vec<Session>> {
        let mut sessions = Vec::new();
        let mut entries = fs::read_dir(&self.sessions_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match atomic_json::read_json::<Session>(&path).await {
                Ok(Some(session)) => sessions.push(session),
                Ok(None) => {}
                Err(err) => {
                    // Keep serving the remaining sessions.
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable session file");
                }
            }
        }

        // Most recently active first.
        sessions.sort_by(|a, b| b.last_activity_at.cmp(&a.last_activity_at));
        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anketa_core::interpreter::KeywordInterpreter;
    use anketa_core::survey::SurveyVersion;
    use tempfile::TempDir;

    fn create_test_session() -> Session {
        Session::new(SurveyVersion::builtin_default())
    }

    #[tokio::test]
    async fn test_save_and_find_by_id() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonSessionRepository::new(temp_dir.path()).await.unwrap();

        let mut session = create_test_session();
        session
            .submit_answer("женский", &KeywordInterpreter::new())
            .unwrap();
        repository.save(&session).await.unwrap();

        let loaded = repository
            .find_by_id(&session.session_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded, session);
        assert_eq!(loaded.answers[0].answer_codes, vec!["F".to_string()]);
    }

    #[tokio::test]
    async fn test_find_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonSessionRepository::new(temp_dir.path()).await.unwrap();

        let result = repository.find_by_id("nonexistent-session").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_list_all_sorted_by_last_activity() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonSessionRepository::new(temp_dir.path()).await.unwrap();

        let mut first = create_test_session();
        first.last_activity_at = "2026-01-01T00:00:00+00:00".to_string();
        let mut second = create_test_session();
        second.last_activity_at = "2026-02-01T00:00:00+00:00".to_string();

        repository.save(&first).await.unwrap();
        repository.save(&second).await.unwrap();

        let sessions = repository.list_all().await.unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].session_id, second.session_id);
        assert_eq!(sessions[1].session_id, first.session_id);
    }

    #[tokio::test]
    async fn test_list_all_skips_unreadable_files() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonSessionRepository::new(temp_dir.path()).await.unwrap();

        repository.save(&create_test_session()).await.unwrap();
        fs::write(temp_dir.path().join("sessions/broken.json"), "not json")
            .await
            .unwrap();

        let sessions = repository.list_all().await.unwrap();
        assert_eq!(sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonSessionRepository::new(temp_dir.path()).await.unwrap();

        let session = create_test_session();
        repository.save(&session).await.unwrap();

        repository.delete(&session.session_id).await.unwrap();
        assert!(repository
            .find_by_id(&session.session_id)
            .await
            .unwrap()
            .is_none());

        // Deleting again is fine.
        repository.delete(&session.session_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_overwrites_existing_document() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonSessionRepository::new(temp_dir.path()).await.unwrap();

        let mut session = create_test_session();
        repository.save(&session).await.unwrap();

        session
            .submit_answer("мужской", &KeywordInterpreter::new())
            .unwrap();
        repository.save(&session).await.unwrap();

        let loaded = repository
            .find_by_id(&session.session_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.answers.len(), 1);
        assert_eq!(loaded.current_question_index, 1);
    }
}
