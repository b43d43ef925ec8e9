use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::instrument;

use super::subject_handlers::check_subject_access;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::dto::{CreateStudyLogDto, ValidatedJson};
use crate::errors::ApiError;
use crate::models::StudyLog;
use crate::repo;

/// Handler for recording study time
///
/// This function handles POST requests to `/api/study-logs`. The log is
/// attributed to the acting user.
///
/// ### Arguments
///
/// * `auth` - The acting user
/// * `pool` - The database connection pool
/// * `payload` - Subject, duration in minutes and date
///
/// ### Returns
///
/// 201 with the created study log as JSON
#[instrument(skip(auth, pool, payload), fields(user_id = %auth.user.get_id(), subject_id = %payload.subject_id))]
pub async fn create_study_log_handler(
    auth: AuthUser,
    State(pool): State<Arc<DbPool>>,
    ValidatedJson(payload): ValidatedJson<CreateStudyLogDto>,
) -> Result<(StatusCode, Json<StudyLog>), ApiError> {
    check_subject_access(&pool, payload.subject_id, auth.user.get_id())?;

    let log = repo::create_study_log(&pool, auth.user.get_id(), payload.subject_id, payload.duration, payload.date)
        .map_err(ApiError::Database)?;

    Ok((StatusCode::CREATED, Json(log)))
}

/// Handler for `GET /api/study-logs`, listing the acting user's logs
#[instrument(skip_all, fields(user_id = %auth.user.get_id()))]
pub async fn list_study_logs_handler(
    auth: AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<Json<Vec<StudyLog>>, ApiError> {
    let logs = repo::get_study_logs_for_user(&pool, auth.user.get_id())
        .map_err(ApiError::Database)?;

    Ok(Json(logs))
}
