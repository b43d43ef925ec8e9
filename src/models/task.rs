use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Represents a checkable unit of work under a subject, typically one chapter
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::tasks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Sequential identifier assigned on creation
    id: i32,

    /// The subject this task belongs to; not checked for existence
    subject_id: i32,

    /// What needs doing
    description: String,

    /// Whether the task has been checked off
    completed: bool,
}

impl Task {
    /// Creates a task with all fields specified
    pub fn new_with_fields(id: i32, subject_id: i32, description: String, completed: bool) -> Self {
        Self {
            id,
            subject_id,
            description,
            completed,
        }
    }

    /// Gets the task's ID
    pub fn get_id(&self) -> i32 {
        self.id
    }

    /// Gets the ID of the subject the task belongs to
    pub fn get_subject_id(&self) -> i32 {
        self.subject_id
    }

    /// Gets the task's description
    pub fn get_description(&self) -> String {
        self.description.clone()
    }

    /// Gets whether the task is completed
    pub fn get_completed(&self) -> bool {
        self.completed
    }
}

/// Insertable form of a task
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::tasks)]
pub struct NewTask {
    pub subject_id: i32,
    pub description: String,
    pub completed: bool,
}

impl NewTask {
    pub fn new(subject_id: i32, description: String) -> Self {
        Self {
            subject_id,
            description,
            completed: false,
        }
    }
}

/// Partial update for a task
///
/// Only the description and completion flag can change; moving a task to
/// another subject is rejected as an unknown field.
#[derive(AsChangeset, Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[diesel(table_name = crate::schema::tasks)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaskUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskUpdate {
    /// Whether the update carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.completed.is_none()
    }
}
