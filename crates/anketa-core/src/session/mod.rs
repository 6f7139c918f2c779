//! Session domain module.
//!
//! This module contains the respondent session model, the state-machine
//! transition logic, the repository interface, and the process-wide
//! session registry.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`Session`, `AnswerRecord`)
//! - `engine`: State-machine transition (`Session::submit_answer`)
//! - `repository`: Repository trait for session persistence
//! - `registry`: Process-wide session store (`SessionRegistry`)

mod engine;
mod model;
mod registry;
mod repository;

// Re-export public API
pub use engine::SubmitOutcome;
pub use model::{AnswerRecord, Session, SessionStatus};
pub use registry::SessionRegistry;
pub use repository::SessionRepository;
