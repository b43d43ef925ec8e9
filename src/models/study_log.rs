use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// A recorded stretch of study time against a subject
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::study_logs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct StudyLog {
    id: i32,
    user_id: i32,
    subject_id: i32,
    /// Length of the session in minutes
    duration: i32,
    date: DateTime<Utc>,
}

impl StudyLog {
    pub fn new_with_fields(id: i32, user_id: i32, subject_id: i32, duration: i32, date: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            subject_id,
            duration,
            date,
        }
    }

    pub fn get_id(&self) -> i32 {
        self.id
    }

    pub fn get_user_id(&self) -> i32 {
        self.user_id
    }

    pub fn get_subject_id(&self) -> i32 {
        self.subject_id
    }

    pub fn get_duration(&self) -> i32 {
        self.duration
    }

    pub fn get_date(&self) -> DateTime<Utc> {
        self.date
    }
}

/// Insertable form of a study log
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::study_logs)]
pub struct NewStudyLog {
    pub user_id: i32,
    pub subject_id: i32,
    pub duration: i32,
    pub date: DateTime<Utc>,
}
