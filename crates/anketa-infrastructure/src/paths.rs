//! Unified path management for Anketa storage.
//!
//! All session and survey-version data lives under one data directory,
//! resolved per platform unless overridden through configuration.

use anketa_core::error::{AnketaError, Result};
use std::path::PathBuf;

/// Unified path management for Anketa.
///
/// # Directory Structure
///
/// ```text
/// ~/.local/share/anketa/       # Data directory (platform-dependent)
/// ├── anketa.toml              # Configuration
/// ├── sessions/                # One JSON document per session
/// └── surveys/                 # Current version + archive
/// ```
pub struct AnketaPaths;

impl AnketaPaths {
    /// Returns the default Anketa data directory.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the platform data directory cannot
    /// be determined.
    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join("anketa"))
            .ok_or_else(|| AnketaError::config("cannot determine platform data directory"))
    }

    /// Returns the sessions directory under `base_dir`.
    pub fn sessions_dir(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join("sessions")
    }

    /// Returns the surveys directory under `base_dir`.
    pub fn surveys_dir(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join("surveys")
    }

    /// Returns the configuration file path under `base_dir`.
    pub fn config_file(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join("anketa.toml")
    }
}
