//! Application configuration.
//!
//! Loaded from `anketa.toml` in the data directory; every field is
//! optional and falls back to a default.

use crate::paths::AnketaPaths;
use anketa_core::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_recent_responses_limit() -> usize {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnketaConfig {
    /// Storage root; platform data directory when absent.
    pub data_dir: Option<PathBuf>,
    /// Size of the `recent_responses` window in dashboard statistics.
    #[serde(default = "default_recent_responses_limit")]
    pub recent_responses_limit: usize,
    /// If set, active sessions idle longer than this many seconds may be
    /// evicted from the in-memory registry (persisted records are kept).
    /// Off by default.
    #[serde(default)]
    pub session_idle_expiry_secs: Option<u64>,
}

impl Default for AnketaConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            recent_responses_limit: default_recent_responses_limit(),
            session_idle_expiry_secs: None,
        }
    }
}

impl AnketaConfig {
    /// Loads configuration from `anketa.toml` under `base_dir`, falling
    /// back to defaults when the file is absent.
    ///
    /// # Errors
    ///
    /// Returns a `Serialization` error when the file exists but cannot
    /// be parsed.
    pub async fn load(base_dir: &Path) -> Result<Self> {
        let path = AnketaPaths::config_file(base_dir);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                let config: Self = toml::from_str(&content)?;
                tracing::debug!(path = %path.display(), "loaded configuration");
                Ok(config)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Resolves the effective data directory.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => AnketaPaths::data_dir(),
        }
    }
}
