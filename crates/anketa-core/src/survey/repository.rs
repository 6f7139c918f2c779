//! Survey version repository trait.
//!
//! Defines the interface for survey version persistence operations.

use super::model::{ArchiveEntry, SurveyVersion};
use crate::error::Result;

/// An abstract repository for survey version persistence.
///
/// This trait defines the contract for persisting the current published
/// version and the append-only archive of prior versions, decoupling the
/// definition store from the specific storage mechanism (e.g., JSON
/// files, database, remote API).
///
/// # Implementation Notes
///
/// The archive is append-only: implementations never delete or rewrite
/// archived versions.
#[async_trait::async_trait]
pub trait SurveyVersionRepository: Send + Sync {
    /// Loads the current published version.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(SurveyVersion))`: A version has been published
    /// - `Ok(None)`: Nothing published yet
    /// - `Err(AnketaError)`: Error occurred during retrieval
    async fn load_current(&self) -> Result<Option<SurveyVersion>>;

    /// Persists the current published version.
    async fn save_current(&self, version: &SurveyVersion) -> Result<()>;

    /// Appends a retired version to the archive together with its
    /// summary entry.
    async fn append_archive(&self, entry: &ArchiveEntry, version: &SurveyVersion) -> Result<()>;

    /// Lists archive summaries, newest first.
    async fn list_archive(&self) -> Result<Vec<ArchiveEntry>>;

    /// Loads an archived version by its retrieval key.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(SurveyVersion))`: Version found
    /// - `Ok(None)`: Unknown key
    /// - `Err(AnketaError)`: Error occurred during retrieval
    async fn load_archived(&self, key: &str) -> Result<Option<SurveyVersion>>;
}
