//! Survey definition domain module.
//!
//! This module contains the survey question models, the repository
//! interface for archived versions, and the definition store that owns
//! the current published version.
//!
//! # Module Structure
//!
//! - `model`: Question and survey version models
//! - `repository`: Repository trait for survey version persistence
//! - `store`: Survey definition store (`SurveyStore`)

mod model;
mod repository;
mod store;

// Re-export public API
pub use model::{AnswerOption, ArchiveEntry, Question, QuestionType, SurveyVersion};
pub use repository::SurveyVersionRepository;
pub use store::{PublishResult, SurveyStore};
