//! Study Planner: exam preparation tracking
//!
//! This library provides the core of a study planner: users organize their
//! exam subjects, break them into tasks, log study time, and can ask a
//! text-completion service either for a subject's chapter list or for
//! free-form help.
//!
//! ### Modules
//!
//! - `auth`: Password hashing, sessions and the authenticated-user extractor
//! - `chapters`: Chapter list generation on top of the completion client
//! - `completion`: HTTP client for an OpenAI-compatible completions endpoint
//! - `config`: Layered server configuration
//! - `db`: Database connection management
//! - `dto`: Request and response payloads
//! - `errors`: The API error type and its HTTP mapping
//! - `handlers`: The HTTP handlers
//! - `models`: Data structures for users, subjects, tasks and study logs
//! - `repo`: Repository layer for database operations
//! - `schema`: Database schema definitions
//!
//! ### Web API
//!
//! Every route lives under `/api`; all but register and login require a
//! session. See [`create_app`] for the full list.

pub mod auth;
pub mod chapters;
pub mod completion;
pub mod config;
pub mod db;
pub mod dto;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod repo;
pub mod schema;

#[cfg(test)]
mod test_utils;

use axum::{
    extract::FromRef,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::completion::CompletionClient;
use crate::handlers::*;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    /// The database connection pool
    pub pool: Arc<db::DbPool>,
    /// Client for the text-completion service
    pub completions: Arc<CompletionClient>,
    /// Lifetime of newly issued sessions
    pub session_ttl: chrono::Duration,
}

impl FromRef<AppState> for Arc<db::DbPool> {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<CompletionClient> {
    fn from_ref(state: &AppState) -> Self {
        state.completions.clone()
    }
}

/// Creates the Axum application with all routes
///
/// ### Arguments
///
/// * `state` - The pool, completion client and session settings shared with all handlers
///
/// ### Returns
///
/// An Axum Router configured with all routes, request tracing, and the state
pub fn create_app(state: AppState) -> Router {
    Router::new()
        // Account management
        .route("/api/register", post(register_handler))
        .route("/api/login", post(login_handler))
        .route("/api/logout", post(logout_handler))
        .route("/api/user", get(current_user_handler))
        // Subjects and their tasks
        .route("/api/subjects", get(list_subjects_handler).post(create_subject_handler))
        .route("/api/subjects/{id}", patch(update_subject_handler))
        .route("/api/subjects/{id}/tasks", get(list_subject_tasks_handler))
        .route("/api/subjects/{id}/fetch-chapters", post(fetch_chapters_handler))
        // Tasks
        .route("/api/tasks", post(create_task_handler))
        .route("/api/tasks/{id}", patch(update_task_handler))
        // Study time
        .route("/api/study-logs", get(list_study_logs_handler).post(create_study_log_handler))
        // Assistant
        .route("/api/chat", post(chat_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the embedded migrations
///
/// ### Arguments
///
/// * `conn` - A mutable reference to a SQLite connection
///
/// ### Errors
///
/// Returns an error if any pending migration fails to apply
pub fn run_migrations(conn: &mut diesel::SqliteConnection) -> anyhow::Result<()> {
    use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

    const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| anyhow::anyhow!(err))?;
    Ok(())
}
