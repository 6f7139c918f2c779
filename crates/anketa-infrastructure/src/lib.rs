//! File-backed persistence for the Anketa survey engine.
//!
//! Sessions and survey versions are stored as one JSON document per
//! entity, written atomically (tmp file + rename). Layout under the
//! data directory:
//!
//! ```text
//! <data_dir>/
//! ├── anketa.toml              # Optional configuration
//! ├── sessions/
//! │   └── <session_id>.json
//! └── surveys/
//!     ├── current.json
//!     └── archive/
//!         ├── index.json       # Append-only archive summaries
//!         └── <version_key>.json
//! ```

pub mod atomic_json;
pub mod config;
pub mod json_session_repository;
pub mod json_survey_repository;
pub mod paths;

pub use config::AnketaConfig;
pub use json_session_repository::JsonSessionRepository;
pub use json_survey_repository::JsonSurveyRepository;
