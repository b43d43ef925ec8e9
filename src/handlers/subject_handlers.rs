use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::auth::AuthUser;
use crate::chapters::generate_chapters;
use crate::completion::CompletionClient;
use crate::db::DbPool;
use crate::dto::{CreateSubjectDto, ValidatedJson};
use crate::errors::ApiError;
use crate::models::{Subject, SubjectUpdate, Task};
use crate::repo;

/// Looks up a subject on behalf of a user
///
/// A subject owned by someone else is reported as not found. An id that
/// matches no subject at all yields `Ok(None)` so callers can decide
/// whether that is an error.
pub(crate) fn check_subject_access(pool: &DbPool, subject_id: i32, user_id: i32) -> Result<Option<Subject>, ApiError> {
    match repo::get_subject(pool, subject_id).map_err(ApiError::Database)? {
        Some(subject) if !subject.is_owned_by(user_id) => {
            debug!("User {} denied access to subject {}", user_id, subject_id);
            Err(ApiError::NotFound("Subject"))
        }
        subject => Ok(subject),
    }
}

/// Handler for listing the acting user's subjects
///
/// This function handles GET requests to `/api/subjects`.
///
/// ### Returns
///
/// The user's subjects as JSON, oldest first
#[instrument(skip_all, fields(user_id = %auth.user.get_id()))]
pub async fn list_subjects_handler(
    auth: AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<Json<Vec<Subject>>, ApiError> {
    let subjects = repo::get_subjects_for_user(&pool, auth.user.get_id())
        .map_err(ApiError::Database)?;

    Ok(Json(subjects))
}

/// Handler for creating a subject
///
/// This function handles POST requests to `/api/subjects`.
///
/// ### Arguments
///
/// * `auth` - The acting user, who becomes the owner
/// * `pool` - The database connection pool
/// * `payload` - The subject name and exam date
///
/// ### Returns
///
/// 201 with the created subject as JSON
#[instrument(skip_all, fields(user_id = %auth.user.get_id()))]
pub async fn create_subject_handler(
    auth: AuthUser,
    State(pool): State<Arc<DbPool>>,
    ValidatedJson(payload): ValidatedJson<CreateSubjectDto>,
) -> Result<(StatusCode, Json<Subject>), ApiError> {
    let subject = repo::create_subject(&pool, auth.user.get_id(), payload.name.trim().to_string(), payload.exam_date)
        .map_err(ApiError::Database)?;

    Ok((StatusCode::CREATED, Json(subject)))
}

/// Handler for partially updating a subject
///
/// This function handles PATCH requests to `/api/subjects/{id}`. Only the
/// fields present in the body change.
///
/// ### Errors
///
/// `NotFound` if the subject does not exist or belongs to another user
#[instrument(skip(auth, pool, changes), fields(user_id = %auth.user.get_id()))]
pub async fn update_subject_handler(
    auth: AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
    ValidatedJson(changes): ValidatedJson<SubjectUpdate>,
) -> Result<Json<Subject>, ApiError> {
    check_subject_access(&pool, id, auth.user.get_id())?
        .ok_or(ApiError::NotFound("Subject"))?;

    let subject = repo::update_subject(&pool, id, &changes)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound("Subject"))?;

    Ok(Json(subject))
}

/// Handler for listing the tasks of a subject
///
/// This function handles GET requests to `/api/subjects/{id}/tasks`.
/// An unknown subject id yields whatever tasks reference it, usually none.
#[instrument(skip(auth, pool), fields(user_id = %auth.user.get_id()))]
pub async fn list_subject_tasks_handler(
    auth: AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<Task>>, ApiError> {
    check_subject_access(&pool, id, auth.user.get_id())?;

    let tasks = repo::get_tasks_for_subject(&pool, id)
        .map_err(ApiError::Database)?;

    Ok(Json(tasks))
}

/// Handler for generating chapter tasks
///
/// This function handles POST requests to `/api/subjects/{id}/fetch-chapters`.
/// It asks the completion service for the chapters of the subject at the
/// user's grade and stores one incomplete task per chapter.
///
/// ### Returns
///
/// The created tasks as JSON, in chapter order
///
/// ### Errors
///
/// * `NotFound` if the subject is missing or foreign, or no chapters came back
/// * `BadRequest` if the user has no grade set
/// * `Upstream` if the completion call fails
#[instrument(skip(auth, pool, completions), fields(user_id = %auth.user.get_id()))]
pub async fn fetch_chapters_handler(
    auth: AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(completions): State<Arc<CompletionClient>>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let subject = check_subject_access(&pool, id, auth.user.get_id())?
        .ok_or(ApiError::NotFound("Subject"))?;

    let grade = auth.user.get_grade()
        .ok_or_else(|| ApiError::BadRequest("Set your grade before fetching chapters".to_string()))?;

    let chapters = generate_chapters(&completions, &subject.get_name(), &grade).await?;

    let tasks = repo::create_tasks(&pool, id, &chapters)
        .map_err(ApiError::Database)?;

    info!("Created {} chapter tasks for subject {}", tasks.len(), id);
    Ok(Json(tasks))
}
