pub mod error;
pub mod interpreter;
pub mod report;
pub mod session;
pub mod survey;

// Re-export common error type
pub use error::{AnketaError, Result};
