use crate::db::DbPool;
use crate::models::{NewStudyLog, StudyLog};
use crate::schema::study_logs;
use anyhow::Result;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use tracing::{instrument, debug, info};

/// Records a stretch of study time for a user
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `user_id` - The user who studied
/// * `subject_id` - The subject studied; not checked for existence
/// * `duration` - Minutes studied
/// * `date` - When the study took place
#[instrument(skip(pool), fields(user_id = %user_id, subject_id = %subject_id, duration = %duration))]
pub fn create_study_log(
    pool: &DbPool,
    user_id: i32,
    subject_id: i32,
    duration: i32,
    date: DateTime<Utc>,
) -> Result<StudyLog> {
    debug!("Creating study log");

    let conn = &mut pool.get()?;

    let log = diesel::insert_into(study_logs::table)
        .values(NewStudyLog { user_id, subject_id, duration, date })
        .returning(StudyLog::as_returning())
        .get_result(conn)?;

    info!("Successfully created study log with id: {}", log.get_id());
    Ok(log)
}

/// Lists every study log of a user, in creation order
#[instrument(skip(pool), fields(user_id = %user_id))]
pub fn get_study_logs_for_user(pool: &DbPool, user_id: i32) -> Result<Vec<StudyLog>> {
    let conn = &mut pool.get()?;

    let result = study_logs::table
        .filter(study_logs::user_id.eq(user_id))
        .order(study_logs::id.asc())
        .select(StudyLog::as_select())
        .load(conn)?;

    debug!("Retrieved {} study logs", result.len());
    Ok(result)
}
