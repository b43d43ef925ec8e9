use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Represents a registered user
///
/// The stored password is an opaque credential produced by
/// [`crate::auth::hash_password`]; it is never serialized.
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Sequential identifier assigned on creation
    id: i32,

    /// Unique login name
    username: String,

    /// Salted password hash
    #[serde(skip_serializing, default)]
    password: String,

    /// School grade, used when generating chapter lists
    grade: Option<String>,

    /// Accumulated study hours
    total_study_hours: i32,
}

impl User {
    /// Creates a user record with all fields specified
    pub fn new_with_fields(
        id: i32,
        username: String,
        password: String,
        grade: Option<String>,
        total_study_hours: i32,
    ) -> Self {
        Self {
            id,
            username,
            password,
            grade,
            total_study_hours,
        }
    }

    /// Gets the user's ID
    pub fn get_id(&self) -> i32 {
        self.id
    }

    /// Gets the user's login name
    pub fn get_username(&self) -> String {
        self.username.clone()
    }

    /// Gets the stored password hash
    pub fn get_password_hash(&self) -> &str {
        &self.password
    }

    /// Gets the user's grade, if one was given
    pub fn get_grade(&self) -> Option<String> {
        self.grade.clone()
    }

    /// Gets the user's accumulated study hours
    pub fn get_total_study_hours(&self) -> i32 {
        self.total_study_hours
    }
}

/// Insertable form of a user; the id and study hours are assigned by the database
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub grade: Option<String>,
}

impl NewUser {
    /// Creates a new user insert, storing a blank grade as absent
    ///
    /// ### Arguments
    ///
    /// * `username` - The login name
    /// * `password_hash` - The already-hashed password
    /// * `grade` - The optional school grade
    pub fn new(username: String, password_hash: String, grade: Option<String>) -> Self {
        let grade = grade
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty());

        Self {
            username,
            password: password_hash,
            grade,
        }
    }
}
