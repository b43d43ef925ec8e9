use crate::db::DbPool;
use crate::models::{NewSubject, Subject, SubjectUpdate};
use crate::schema::subjects;
use anyhow::Result;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use tracing::{instrument, debug, info};

/// Creates a new subject for a user
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `user_id` - The owning user
/// * `name` - The subject name
/// * `exam_date` - When the exam takes place
///
/// ### Returns
///
/// The newly created Subject, not yet completed
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The database insert operation fails
#[instrument(skip(pool), fields(user_id = %user_id, name = %name))]
pub fn create_subject(pool: &DbPool, user_id: i32, name: String, exam_date: DateTime<Utc>) -> Result<Subject> {
    debug!("Creating new subject");

    let conn = &mut pool.get()?;

    let subject = diesel::insert_into(subjects::table)
        .values(NewSubject::new(user_id, name, exam_date))
        .returning(Subject::as_returning())
        .get_result(conn)?;

    info!("Successfully created subject with id: {}", subject.get_id());
    Ok(subject)
}

/// Retrieves a subject by ID, regardless of owner
///
/// ### Returns
///
/// A Result containing an Option with the Subject if found, or None if not found
#[instrument(skip(pool), fields(subject_id = %id))]
pub fn get_subject(pool: &DbPool, id: i32) -> Result<Option<Subject>> {
    debug!("Retrieving subject");

    let conn = &mut pool.get()?;

    let result = subjects::table
        .find(id)
        .select(Subject::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

/// Lists every subject owned by a user, in creation order
#[instrument(skip(pool), fields(user_id = %user_id))]
pub fn get_subjects_for_user(pool: &DbPool, user_id: i32) -> Result<Vec<Subject>> {
    let conn = &mut pool.get()?;

    let result = subjects::table
        .filter(subjects::user_id.eq(user_id))
        .order(subjects::id.asc())
        .select(Subject::as_select())
        .load(conn)?;

    debug!("Retrieved {} subjects", result.len());
    Ok(result)
}

/// Merges the present fields of `changes` onto a subject
///
/// Fields that are absent from the update keep their stored values. An
/// update with no fields returns the subject unchanged.
///
/// ### Returns
///
/// The updated Subject, or None if no subject has that ID
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The database update fails
#[instrument(skip(pool), fields(subject_id = %id))]
pub fn update_subject(pool: &DbPool, id: i32, changes: &SubjectUpdate) -> Result<Option<Subject>> {
    debug!("Updating subject with {:?}", changes);

    let conn = &mut pool.get()?;

    if changes.is_empty() {
        let unchanged = subjects::table
            .find(id)
            .select(Subject::as_select())
            .first(conn)
            .optional()?;
        return Ok(unchanged);
    }

    let updated = diesel::update(subjects::table.find(id))
        .set(changes)
        .returning(Subject::as_returning())
        .get_result(conn)
        .optional()?;

    match &updated {
        Some(subject) => info!("Updated subject {}", subject.get_id()),
        None => debug!("Subject not found"),
    }

    Ok(updated)
}
