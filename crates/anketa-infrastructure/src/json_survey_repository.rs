//! JSON-file-backed SurveyVersionRepository implementation.
//!
//! Layout under `surveys/`:
//!
//! - `current.json` — the current published version
//! - `archive/index.json` — append-only list of archive summaries
//! - `archive/<key>.json` — full archived versions, one per key
//!
//! Keeping the summaries in a separate index means listing the archive
//! never loads historical question blobs.

use crate::atomic_json;
use anketa_core::error::Result;
use anketa_core::survey::{ArchiveEntry, SurveyVersion, SurveyVersionRepository};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

pub struct JsonSurveyRepository {
    surveys_dir: PathBuf,
    archive_dir: PathBuf,
}

impl JsonSurveyRepository {
    /// Creates a repository rooted at `base_dir`, creating the
    /// `surveys/archive/` directory tree if needed.
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let surveys_dir = crate::paths::AnketaPaths::surveys_dir(base_dir.as_ref());
        let archive_dir = surveys_dir.join("archive");
        fs::create_dir_all(&archive_dir).await?;
        Ok(Self {
            surveys_dir,
            archive_dir,
        })
    }

    fn current_path(&self) -> PathBuf {
        self.surveys_dir.join("current.json")
    }

    fn index_path(&self) -> PathBuf {
        self.archive_dir.join("index.json")
    }

    fn version_path(&self, key: &str) -> PathBuf {
        self.archive_dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl SurveyVersionRepository for JsonSurveyRepository {
    async fn load_current(&self) -> Result<Option<SurveyVersion>> {
        atomic_json::read_json(&self.current_path()).await
    }

    async fn save_current(&self, version: &SurveyVersion) -> Result<()> {
        atomic_json::write_json(&self.current_path(), version).await
    }

    async fn append_archive(&self, entry: &ArchiveEntry, version: &SurveyVersion) -> Result<()> {
        atomic_json::write_json(&self.version_path(&entry.key), version).await?;

        let mut index: Vec<ArchiveEntry> = atomic_json::read_json(&self.index_path())
            .await?
            .unwrap_or_default();
        index.push(entry.clone());
        atomic_json::write_json(&self.index_path(), &index).await?;

        tracing::info!(key = %entry.key, "archived survey version");
        Ok(())
    }

    async fn list_archive(&self) -> Result<Vec<ArchiveEntry>> {
        let mut index: Vec<ArchiveEntry> = atomic_json::read_json(&self.index_path())
            .await?
            .unwrap_or_default();
        // Newest first.
        index.sort_by(|a, b| b.archived_at.cmp(&a.archived_at));
        Ok(index)
    }

    async fn load_archived(&self, key: &str) -> Result<Option<SurveyVersion>> {
        atomic_json::read_json(&self.version_path(key)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn version(key: &str, created_at: &str) -> SurveyVersion {
        SurveyVersion {
            key: key.to_string(),
            created_at: created_at.to_string(),
            questions: SurveyVersion::builtin_default().questions,
        }
    }

    fn entry(key: &str, archived_at: &str) -> ArchiveEntry {
        ArchiveEntry {
            key: key.to_string(),
            archived_at: archived_at.to_string(),
            question_count: 3,
            first_question_text: "Ваш пол?".to_string(),
        }
    }

    #[tokio::test]
    async fn test_current_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonSurveyRepository::new(temp_dir.path()).await.unwrap();

        assert!(repository.load_current().await.unwrap().is_none());

        let current = version("survey_a", "2026-01-01T00:00:00+00:00");
        repository.save_current(&current).await.unwrap();

        let loaded = repository.load_current().await.unwrap().unwrap();
        assert_eq!(loaded, current);
    }

    #[tokio::test]
    async fn test_archive_append_and_lookup() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonSurveyRepository::new(temp_dir.path()).await.unwrap();

        let archived = version("survey_old", "2026-01-01T00:00:00+00:00");
        repository
            .append_archive(&entry("survey_old", "2026-02-01T00:00:00+00:00"), &archived)
            .await
            .unwrap();

        let index = repository.list_archive().await.unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index[0].key, "survey_old");
        assert_eq!(index[0].question_count, 3);

        let loaded = repository.load_archived("survey_old").await.unwrap().unwrap();
        assert_eq!(loaded, archived);
    }

    #[tokio::test]
    async fn test_list_archive_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonSurveyRepository::new(temp_dir.path()).await.unwrap();

        repository
            .append_archive(
                &entry("survey_a", "2026-01-01T00:00:00+00:00"),
                &version("survey_a", "2025-12-01T00:00:00+00:00"),
            )
            .await
            .unwrap();
        repository
            .append_archive(
                &entry("survey_b", "2026-03-01T00:00:00+00:00"),
                &version("survey_b", "2026-01-01T00:00:00+00:00"),
            )
            .await
            .unwrap();

        let index = repository.list_archive().await.unwrap();
        assert_eq!(index[0].key, "survey_b");
        assert_eq!(index[1].key, "survey_a");
    }

    #[tokio::test]
    async fn test_load_archived_unknown_key() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonSurveyRepository::new(temp_dir.path()).await.unwrap();

        assert!(repository.load_archived("missing").await.unwrap().is_none());
    }
}
