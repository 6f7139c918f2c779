//! Composition root.
//!
//! Wires the file-backed repositories, definition store, registry, and
//! services into one [`AnketaApp`]. The outer HTTP collaborator holds
//! this struct and forwards boundary calls to its services.

use crate::admin::AdminService;
use crate::chat::ChatService;
use anketa_core::error::Result;
use anketa_core::interpreter::KeywordInterpreter;
use anketa_core::session::SessionRegistry;
use anketa_core::survey::SurveyStore;
use anketa_infrastructure::{AnketaConfig, JsonSessionRepository, JsonSurveyRepository};
use std::path::Path;
use std::sync::Arc;

/// The assembled application.
pub struct AnketaApp {
    pub chat: ChatService,
    pub admin: AdminService,
    registry: Arc<SessionRegistry>,
    config: AnketaConfig,
}

impl AnketaApp {
    /// Builds the application against the default data directory.
    pub async fn init() -> Result<Self> {
        let config = AnketaConfig::default();
        let base_dir = config.resolve_data_dir()?;
        Self::with_config(config, &base_dir).await
    }

    /// Builds the application rooted at `base_dir`, loading `anketa.toml`
    /// from there when present.
    pub async fn open(base_dir: &Path) -> Result<Self> {
        let config = AnketaConfig::load(base_dir).await?;
        Self::with_config(config, base_dir).await
    }

    async fn with_config(config: AnketaConfig, base_dir: &Path) -> Result<Self> {
        let session_repository = Arc::new(JsonSessionRepository::new(base_dir).await?);
        let survey_repository = Arc::new(JsonSurveyRepository::new(base_dir).await?);

        let store = Arc::new(SurveyStore::load(survey_repository).await?);
        let registry = Arc::new(SessionRegistry::new(
            session_repository,
            Arc::new(KeywordInterpreter::new()),
        ));

        tracing::info!(base_dir = %base_dir.display(), "anketa services initialized");
        Ok(Self {
            chat: ChatService::new(registry.clone(), store.clone()),
            admin: AdminService::new(store, registry.clone(), config.recent_responses_limit),
            registry,
            config,
        })
    }

    /// Evicts idle in-memory sessions per `session_idle_expiry_secs`.
    ///
    /// No-op when expiry is not configured. Intended to be invoked from
    /// an operator endpoint or a deployment-level scheduler; the core
    /// runs no background tasks.
    pub async fn purge_idle_sessions(&self) -> usize {
        match self.config.session_idle_expiry_secs {
            Some(secs) => {
                self.registry
                    .purge_idle(chrono::Duration::seconds(secs as i64))
                    .await
            }
            None => 0,
        }
    }
}
