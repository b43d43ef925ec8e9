use crate::db::DbPool;
use crate::models::{NewTask, Task, TaskUpdate};
use crate::schema::tasks;
use anyhow::Result;
use diesel::prelude::*;
use tracing::{instrument, debug, info};

/// Creates a new task under a subject
///
/// The subject is not checked for existence; a task may point at a subject
/// ID that does not exist.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `subject_id` - The subject the task belongs to
/// * `description` - What needs doing
///
/// ### Returns
///
/// The newly created Task, not yet completed
#[instrument(skip(pool), fields(subject_id = %subject_id))]
pub fn create_task(pool: &DbPool, subject_id: i32, description: String) -> Result<Task> {
    debug!("Creating new task");

    let conn = &mut pool.get()?;

    let task = diesel::insert_into(tasks::table)
        .values(NewTask::new(subject_id, description))
        .returning(Task::as_returning())
        .get_result(conn)?;

    info!("Successfully created task with id: {}", task.get_id());
    Ok(task)
}

/// Creates one task per description under a subject, all or nothing
///
/// Every insert runs inside a single transaction: if any of them fails the
/// whole batch is rolled back and no task is left behind.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `subject_id` - The subject the tasks belong to
/// * `descriptions` - One description per task, in order
///
/// ### Returns
///
/// The created tasks, in the order of `descriptions`
#[instrument(skip(pool, descriptions), fields(subject_id = %subject_id, count = descriptions.len()))]
pub fn create_tasks(pool: &DbPool, subject_id: i32, descriptions: &[String]) -> Result<Vec<Task>> {
    debug!("Creating task batch");

    let conn = &mut pool.get()?;

    let created = conn.immediate_transaction(|conn| {
        descriptions
            .iter()
            .map(|description| {
                diesel::insert_into(tasks::table)
                    .values(NewTask::new(subject_id, description.clone()))
                    .returning(Task::as_returning())
                    .get_result(conn)
            })
            .collect::<QueryResult<Vec<Task>>>()
    })?;

    info!("Created {} tasks for subject {}", created.len(), subject_id);
    Ok(created)
}

/// Retrieves a task by ID
#[instrument(skip(pool), fields(task_id = %id))]
pub fn get_task(pool: &DbPool, id: i32) -> Result<Option<Task>> {
    let conn = &mut pool.get()?;

    let result = tasks::table
        .find(id)
        .select(Task::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

/// Lists the tasks whose subject ID matches, in creation order
#[instrument(skip(pool), fields(subject_id = %subject_id))]
pub fn get_tasks_for_subject(pool: &DbPool, subject_id: i32) -> Result<Vec<Task>> {
    let conn = &mut pool.get()?;

    let result = tasks::table
        .filter(tasks::subject_id.eq(subject_id))
        .order(tasks::id.asc())
        .select(Task::as_select())
        .load(conn)?;

    debug!("Retrieved {} tasks", result.len());
    Ok(result)
}

/// Merges the present fields of `changes` onto a task
///
/// ### Returns
///
/// The updated Task, or None if no task has that ID. A missing task is
/// never created by an update.
#[instrument(skip(pool), fields(task_id = %id))]
pub fn update_task(pool: &DbPool, id: i32, changes: &TaskUpdate) -> Result<Option<Task>> {
    debug!("Updating task with {:?}", changes);

    let conn = &mut pool.get()?;

    if changes.is_empty() {
        let unchanged = tasks::table
            .find(id)
            .select(Task::as_select())
            .first(conn)
            .optional()?;
        return Ok(unchanged);
    }

    let updated = diesel::update(tasks::table.find(id))
        .set(changes)
        .returning(Task::as_returning())
        .get_result(conn)
        .optional()?;

    if updated.is_none() {
        debug!("Task not found");
    }

    Ok(updated)
}

#[cfg(test)]
mod tests;
