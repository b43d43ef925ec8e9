//! Data models module
//!
//! This module defines the core data structures used throughout the application.
//! Each entity has a queryable record type that maps to its database table, an
//! insertable `New*` type for creation, and (where the entity can be edited) a
//! partial-update changeset.

mod user;
pub use user::{NewUser, User};

mod session;
pub use session::Session;

mod subject;
pub use subject::{NewSubject, Subject, SubjectUpdate};

mod task;
pub use task::{NewTask, Task, TaskUpdate};

mod study_log;
pub use study_log::{NewStudyLog, StudyLog};
