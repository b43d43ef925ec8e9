//! Repository module
//!
//! This module provides the data access layer for the application.
//! It contains functions for creating, retrieving, and updating users,
//! sessions, subjects, tasks and study logs.
//!
//! The repository pattern abstracts away the details of database access
//! and provides a clean API for the rest of the application to use.
//! Every function takes the shared connection pool, so the store is passed
//! around explicitly rather than reached through global state.

mod user_repo;
mod session_repo;
mod subject_repo;
mod task_repo;
mod study_log_repo;

// Re-export all repository functions
pub use user_repo::*;
pub use session_repo::*;
pub use subject_repo::*;
pub use task_repo::*;
pub use study_log_repo::*;
