//! Web API Handlers
//!
//! This module contains the handlers for the JSON API under `/api`.
//! Each handler resolves the acting user, validates its payload, calls the
//! repository layer (and the completion service where needed) and returns
//! the resulting records.

mod auth_handlers;
mod subject_handlers;
mod task_handlers;
mod study_log_handlers;
mod chat_handlers;

// Re-export all handlers
pub use auth_handlers::*;
pub use subject_handlers::*;
pub use task_handlers::*;
pub use study_log_handlers::*;
pub use chat_handlers::*;
