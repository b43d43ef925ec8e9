use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Represents a subject a user is studying toward an exam
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::subjects)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    /// Sequential identifier assigned on creation
    id: i32,

    /// The user that owns this subject
    user_id: i32,

    /// Display name, also used to prompt for chapter lists
    name: String,

    /// When the exam takes place
    exam_date: DateTime<Utc>,

    /// Whether the user has marked the subject as done
    completed: bool,
}

impl Subject {
    /// Creates a subject with all fields specified
    ///
    /// ### Arguments
    ///
    /// * `id` - The subject ID
    /// * `user_id` - The owning user
    /// * `name` - The subject name
    /// * `exam_date` - The exam date
    /// * `completed` - Whether the subject is completed
    pub fn new_with_fields(id: i32, user_id: i32, name: String, exam_date: DateTime<Utc>, completed: bool) -> Self {
        Self {
            id,
            user_id,
            name,
            exam_date,
            completed,
        }
    }

    /// Gets the subject's ID
    pub fn get_id(&self) -> i32 {
        self.id
    }

    /// Gets the ID of the owning user
    pub fn get_user_id(&self) -> i32 {
        self.user_id
    }

    /// Gets the subject's name
    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    /// Gets the exam date
    pub fn get_exam_date(&self) -> DateTime<Utc> {
        self.exam_date
    }

    /// Gets whether the subject is completed
    pub fn get_completed(&self) -> bool {
        self.completed
    }

    /// Whether the given user owns this subject
    pub fn is_owned_by(&self, user_id: i32) -> bool {
        self.user_id == user_id
    }
}

/// Insertable form of a subject
///
/// `completed` is always written as `false` on creation.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::subjects)]
pub struct NewSubject {
    pub user_id: i32,
    pub name: String,
    pub exam_date: DateTime<Utc>,
    pub completed: bool,
}

impl NewSubject {
    pub fn new(user_id: i32, name: String, exam_date: DateTime<Utc>) -> Self {
        Self {
            user_id,
            name,
            exam_date,
            completed: false,
        }
    }
}

/// Partial update for a subject
///
/// Absent fields leave the stored value untouched. Unknown fields (including
/// `id` and `userId`) are rejected during deserialization.
#[derive(AsChangeset, Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[diesel(table_name = crate::schema::subjects)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SubjectUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl SubjectUpdate {
    /// Whether the update carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.exam_date.is_none() && self.completed.is_none()
    }
}
