//! Session repository trait.
//!
//! Defines the interface for session persistence operations.

use super::model::Session;
use crate::error::Result;

/// An abstract repository for managing session persistence.
///
/// This trait defines the contract for persisting and retrieving
/// sessions, decoupling the conversation engine from the specific
/// storage mechanism (e.g., JSON files, database, remote API).
///
/// # Implementation Notes
///
/// Sessions are never deleted by the core; `delete` exists for
/// operational cleanup tooling only.
#[async_trait::async_trait]
pub trait SessionRepository: Send + Sync {
    /// Finds a session by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Session))`: Session found
    /// - `Ok(None)`: Session not found
    /// - `Err(AnketaError)`: Error occurred during retrieval
    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>>;

    /// Saves a session to storage.
    async fn save(&self, session: &Session) -> Result<()>;

    /// Deletes a session from storage (no-op if it doesn't exist).
    async fn delete(&self, session_id: &str) -> Result<()>;

    /// Lists all stored sessions, most recently active first.
    async fn list_all(&self) -> Result<Vec<Session>>;
}
