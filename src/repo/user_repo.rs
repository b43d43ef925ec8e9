use crate::db::DbPool;
use crate::models::{NewUser, User};
use crate::schema::users;
use anyhow::Result;
use diesel::prelude::*;
use thiserror::Error;
use tracing::{instrument, debug, info, warn};

/// Failure modes of [`create_user`]
#[derive(Error, Debug)]
pub enum CreateUserError {
    #[error("username already exists: {0}")]
    DuplicateUsername(String),
    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

/// Creates a new user in the database
///
/// The username is looked up inside the same transaction as the insert, so
/// two registrations racing for one name cannot both succeed. The unique
/// index on `users.username` backs this up.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `username` - The login name
/// * `password_hash` - The already-hashed password
/// * `grade` - The optional school grade; blank values are stored as null
///
/// ### Returns
///
/// The newly created User, with `total_study_hours` at 0
///
/// ### Errors
///
/// Returns `DuplicateUsername` if the name is taken, or `Database` if:
/// - Unable to get a connection from the pool
/// - The database query or insert fails
#[instrument(skip(pool, password_hash), fields(username = %username))]
pub fn create_user(pool: &DbPool, username: &str, password_hash: &str, grade: Option<String>) -> Result<User, CreateUserError> {
    debug!("Creating new user");

    let conn = &mut pool.get().map_err(anyhow::Error::from)?;
    let new_user = NewUser::new(username.to_string(), password_hash.to_string(), grade);

    let created = conn
        .immediate_transaction(|conn| -> QueryResult<Option<User>> {
            let existing = users::table
                .filter(users::username.eq(username))
                .select(User::as_select())
                .first(conn)
                .optional()?;

            if existing.is_some() {
                return Ok(None);
            }

            diesel::insert_into(users::table)
                .values(&new_user)
                .returning(User::as_returning())
                .get_result(conn)
                .map(Some)
        })
        .map_err(anyhow::Error::from)?;

    match created {
        Some(user) => {
            info!("Successfully created user with id: {}", user.get_id());
            Ok(user)
        }
        None => {
            warn!("Username already taken");
            Err(CreateUserError::DuplicateUsername(username.to_string()))
        }
    }
}

/// Retrieves a user by ID
///
/// ### Returns
///
/// A Result containing an Option with the User if found, or None if not found
#[instrument(skip(pool))]
pub fn get_user(pool: &DbPool, id: i32) -> Result<Option<User>> {
    let conn = &mut pool.get()?;

    let result = users::table
        .find(id)
        .select(User::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

/// Retrieves a user by login name
///
/// ### Returns
///
/// A Result containing an Option with the User if found, or None if not found
#[instrument(skip(pool))]
pub fn get_user_by_username(pool: &DbPool, username: &str) -> Result<Option<User>> {
    debug!("Looking up user by username");

    let conn = &mut pool.get()?;

    let result = users::table
        .filter(users::username.eq(username))
        .select(User::as_select())
        .first(conn)
        .optional()?;

    if result.is_none() {
        debug!("User not found");
    }

    Ok(result)
}
