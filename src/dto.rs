use axum::extract::{FromRequest, Request};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;
use crate::models::{SubjectUpdate, TaskUpdate};

/// Field-level checks that run after a payload has been deserialized
pub trait Validate {
    /// Returns a client-facing message describing the first problem found
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} must not be empty", field));
    }
    Ok(())
}

/// JSON body extractor that reports every rejection as a validation failure
///
/// Malformed JSON, missing or unknown fields, wrong types and failed
/// [`Validate`] checks all become `ApiError::Validation` (400).
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

        value.validate().map_err(ApiError::Validation)?;
        Ok(Self(value))
    }
}

/// Data transfer object for registering an account
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterDto {
    pub username: String,
    pub password: String,
    /// School grade used for chapter generation
    #[serde(default)]
    pub grade: Option<String>,
}

impl Validate for RegisterDto {
    fn validate(&self) -> Result<(), String> {
        require_non_empty("username", &self.username)?;
        require_non_empty("password", &self.password)
    }
}

/// Data transfer object for logging in
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginDto {
    pub username: String,
    pub password: String,
}

impl Validate for LoginDto {
    fn validate(&self) -> Result<(), String> {
        require_non_empty("username", &self.username)?;
        require_non_empty("password", &self.password)
    }
}

/// Data transfer object for creating a subject
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateSubjectDto {
    pub name: String,
    /// RFC 3339 timestamp of the exam
    pub exam_date: DateTime<Utc>,
}

impl Validate for CreateSubjectDto {
    fn validate(&self) -> Result<(), String> {
        require_non_empty("name", &self.name)
    }
}

impl Validate for SubjectUpdate {
    fn validate(&self) -> Result<(), String> {
        match &self.name {
            Some(name) => require_non_empty("name", name),
            None => Ok(()),
        }
    }
}

/// Data transfer object for creating a task
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTaskDto {
    pub description: String,
    pub subject_id: i32,
}

impl Validate for CreateTaskDto {
    fn validate(&self) -> Result<(), String> {
        require_non_empty("description", &self.description)
    }
}

impl Validate for TaskUpdate {
    fn validate(&self) -> Result<(), String> {
        match &self.description {
            Some(description) => require_non_empty("description", description),
            None => Ok(()),
        }
    }
}

/// Data transfer object for logging study time
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateStudyLogDto {
    pub subject_id: i32,
    /// Minutes studied
    pub duration: i32,
    pub date: DateTime<Utc>,
}

impl Validate for CreateStudyLogDto {
    fn validate(&self) -> Result<(), String> {
        if self.duration <= 0 {
            return Err("duration must be a positive number of minutes".to_string());
        }
        Ok(())
    }
}

/// Data transfer object for a chat message
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ChatRequestDto {
    pub message: String,
}

impl Validate for ChatRequestDto {
    // Forwarded verbatim, so only a truly empty message is refused
    fn validate(&self) -> Result<(), String> {
        if self.message.is_empty() {
            return Err("message must not be empty".to_string());
        }
        Ok(())
    }
}

/// Assistant reply returned by the chat endpoint
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatResponseDto {
    pub response: String,
}
