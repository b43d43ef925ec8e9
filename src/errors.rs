use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json
};
use thiserror::Error;
use tracing::error;

use crate::chapters::ChapterError;
use crate::completion::UpstreamError;
use crate::repo::CreateUserError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
    #[error("Authentication required")]
    Unauthorized,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Username already exists")]
    DuplicateUsername,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Upstream completion error: {0}")]
    Upstream(#[from] UpstreamError),
}

impl From<CreateUserError> for ApiError {
    fn from(err: CreateUserError) -> Self {
        match err {
            CreateUserError::DuplicateUsername(_) => ApiError::DuplicateUsername,
            CreateUserError::Database(err) => ApiError::Database(err),
        }
    }
}

impl From<ChapterError> for ApiError {
    fn from(err: ChapterError) -> Self {
        match err {
            ChapterError::GenerationFailure(err) => ApiError::Upstream(err),
            ChapterError::EmptyResult => ApiError::NotFound("Chapters"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Database(err) => {
                error!("Database error: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            ApiError::Upstream(err) => {
                error!("Completion service error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to process completion request".to_string())
            }
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Authentication required".to_string()),
            ApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid username or password".to_string()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::DuplicateUsername => (StatusCode::BAD_REQUEST, "Username already exists".to_string()),
            ApiError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{} not found", what)),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests;
