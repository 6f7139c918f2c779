//! Use-case layer for the Anketa survey engine.
//!
//! Two services make up the boundary the outer HTTP/UI collaborators
//! talk to: [`ChatService`] for respondents and [`AdminService`] for
//! administrators. Both hold shared `Arc` references to the session
//! registry and survey definition store; neither owns any routing,
//! rendering, or authentication mechanics.

pub mod admin;
pub mod bootstrap;
pub mod chat;

pub use admin::{AdminService, PublishResponse};
pub use bootstrap::AnketaApp;
pub use chat::{ChatResponse, ChatService, StartChatResponse};
