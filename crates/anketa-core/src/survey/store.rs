//! Survey definition store.
//!
//! Owns exactly one *current* [`SurveyVersion`] plus an append-only
//! archive of prior versions. Publishing validates the candidate
//! question list, archives the replaced version, and swaps the current
//! pointer under a single writer lock so readers never observe a
//! partially-updated version.

use super::model::{ArchiveEntry, Question, SurveyVersion};
use super::repository::SurveyVersionRepository;
use crate::error::{AnketaError, Result};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Outcome of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishResult {
    /// Number of questions in the newly published version.
    pub questions_count: usize,
    /// Whether a previously published version was archived.
    pub previous_version_saved: bool,
}

/// The survey definition store.
///
/// Readers take an immutable snapshot of the current version, never a
/// live reference, so in-flight sessions are unaffected by a later
/// publish. `None` means nothing has been published yet; `get_current`
/// then serves the built-in default questionnaire.
pub struct SurveyStore {
    current: RwLock<Option<Arc<SurveyVersion>>>,
    default_version: Arc<SurveyVersion>,
    repository: Arc<dyn SurveyVersionRepository>,
}

impl SurveyStore {
    /// Creates a store, restoring the current version from the repository
    /// if one was published before.
    pub async fn load(repository: Arc<dyn SurveyVersionRepository>) -> Result<Self> {
        let current = repository.load_current().await?.map(Arc::new);
        if let Some(version) = &current {
            tracing::info!(key = %version.key, "restored current survey version");
        }
        Ok(Self {
            current: RwLock::new(current),
            default_version: Arc::new(SurveyVersion::builtin_default()),
            repository,
        })
    }

    /// Returns a snapshot of the current survey version.
    ///
    /// Never fails: if nothing has ever been published, the built-in
    /// default questionnaire is returned.
    pub async fn get_current(&self) -> Arc<SurveyVersion> {
        let current = self.current.read().await;
        current
            .as_ref()
            .cloned()
            .unwrap_or_else(|| self.default_version.clone())
    }

    /// Validates and publishes a new survey version.
    ///
    /// On success the replaced version (if any) is archived with a
    /// summary entry, then the current pointer is swapped. On validation
    /// failure the current version is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `AnketaError::Validation` naming the first violated
    /// invariant, or a storage error from the repository.
    pub async fn publish(&self, questions: Vec<Question>) -> Result<PublishResult> {
        validate_questions(&questions)?;

        let new_version = SurveyVersion {
            key: generate_version_key(),
            created_at: Utc::now().to_rfc3339(),
            questions,
        };

        // Single writer lock: archive + save + swap are not observable
        // in a half-finished state.
        let mut current = self.current.write().await;

        let previous_version_saved = if let Some(previous) = current.as_ref() {
            let entry = ArchiveEntry {
                key: previous.key.clone(),
                archived_at: Utc::now().to_rfc3339(),
                question_count: previous.questions.len(),
                first_question_text: previous
                    .questions
                    .first()
                    .map(|q| q.prompt.clone())
                    .unwrap_or_default(),
            };
            self.repository.append_archive(&entry, previous).await?;
            tracing::info!(key = %previous.key, "archived previous survey version");
            true
        } else {
            false
        };

        self.repository.save_current(&new_version).await?;
        let questions_count = new_version.questions.len();
        tracing::info!(key = %new_version.key, questions_count, "published survey version");
        *current = Some(Arc::new(new_version));

        Ok(PublishResult {
            questions_count,
            previous_version_saved,
        })
    }

    /// Lists archived version summaries, newest first.
    pub async fn list_versions(&self) -> Result<Vec<ArchiveEntry>> {
        self.repository.list_archive().await
    }

    /// Loads an archived version by its retrieval key.
    ///
    /// # Errors
    ///
    /// Returns `AnketaError::NotFound` for an unknown key.
    pub async fn get_version(&self, key: &str) -> Result<SurveyVersion> {
        self.repository
            .load_archived(key)
            .await?
            .ok_or_else(|| AnketaError::not_found("survey version", key))
    }
}

/// Generates a filename-safe version key from the publish timestamp.
fn generate_version_key() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "survey_{}_{}",
        Utc::now().format("%Y%m%d_%H%M%S"),
        &suffix[..8]
    )
}

/// Validates a candidate question list, reporting the first violated
/// invariant.
fn validate_questions(questions: &[Question]) -> Result<()> {
    if questions.is_empty() {
        return Err(AnketaError::validation("survey must contain at least one question"));
    }

    let mut last_id: Option<u32> = None;
    for question in questions {
        if let Some(prev) = last_id {
            if question.id <= prev {
                return Err(AnketaError::validation(format!(
                    "question ids must be unique and strictly increasing: {} follows {}",
                    question.id, prev
                )));
            }
        }
        last_id = Some(question.id);

        if question.question_type.is_choice() && question.options.is_empty() {
            return Err(AnketaError::validation(format!(
                "choice question {} must define at least one option",
                question.id
            )));
        }

        let mut codes = HashSet::new();
        for option in &question.options {
            if !codes.insert(option.code.as_str()) {
                return Err(AnketaError::validation(format!(
                    "question {} defines duplicate option code '{}'",
                    question.id, option.code
                )));
            }
        }
    }

    Ok(())
}
