use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::instrument;

use super::subject_handlers::check_subject_access;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::dto::{CreateTaskDto, ValidatedJson};
use crate::errors::ApiError;
use crate::models::{Task, TaskUpdate};
use crate::repo;

/// Handler for creating a task
///
/// This function handles POST requests to `/api/tasks`. The subject is not
/// required to exist, but it must not belong to another user.
///
/// ### Returns
///
/// 201 with the created task as JSON
#[instrument(skip(auth, pool, payload), fields(user_id = %auth.user.get_id(), subject_id = %payload.subject_id))]
pub async fn create_task_handler(
    auth: AuthUser,
    State(pool): State<Arc<DbPool>>,
    ValidatedJson(payload): ValidatedJson<CreateTaskDto>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    check_subject_access(&pool, payload.subject_id, auth.user.get_id())?;

    let task = repo::create_task(&pool, payload.subject_id, payload.description.trim().to_string())
        .map_err(ApiError::Database)?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Handler for partially updating a task
///
/// This function handles PATCH requests to `/api/tasks/{id}`.
///
/// ### Errors
///
/// `NotFound` if the task does not exist or its subject belongs to another user
#[instrument(skip(auth, pool, changes), fields(user_id = %auth.user.get_id()))]
pub async fn update_task_handler(
    auth: AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
    ValidatedJson(changes): ValidatedJson<TaskUpdate>,
) -> Result<Json<Task>, ApiError> {
    let task = repo::get_task(&pool, id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound("Task"))?;

    check_subject_access(&pool, task.get_subject_id(), auth.user.get_id())
        .map_err(|err| match err {
            ApiError::NotFound(_) => ApiError::NotFound("Task"),
            other => other,
        })?;

    let task = repo::update_task(&pool, id, &changes)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound("Task"))?;

    Ok(Json(task))
}
