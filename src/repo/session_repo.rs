use crate::db::DbPool;
use crate::models::Session;
use crate::schema::sessions;
use anyhow::Result;
use chrono::{Duration, Utc};
use diesel::prelude::*;
use tracing::{instrument, debug, info};

/// Starts a new session for a user
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `user_id` - The user the session belongs to
/// * `ttl` - How long the session stays valid
#[instrument(skip(pool))]
pub fn create_session(pool: &DbPool, user_id: i32, ttl: Duration) -> Result<Session> {
    let conn = &mut pool.get()?;

    let session = Session::new(user_id, ttl);
    diesel::insert_into(sessions::table)
        .values(&session)
        .execute(conn)?;

    debug!("Session created, expires at {}", session.get_expires_at());
    Ok(session)
}

/// Looks up a session by token, ignoring expired ones
///
/// ### Returns
///
/// The session if it exists and has not expired, otherwise None
#[instrument(skip(pool, token))]
pub fn get_active_session(pool: &DbPool, token: &str) -> Result<Option<Session>> {
    let conn = &mut pool.get()?;

    let session = sessions::table
        .find(token)
        .select(Session::as_select())
        .first(conn)
        .optional()?;

    Ok(session.filter(|s| s.is_active_at(Utc::now())))
}

/// Ends a session
///
/// ### Returns
///
/// Whether a session with that token existed
#[instrument(skip(pool, token))]
pub fn delete_session(pool: &DbPool, token: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let deleted = diesel::delete(sessions::table.find(token)).execute(conn)?;
    Ok(deleted > 0)
}

/// Removes every session whose expiry has passed
///
/// ### Returns
///
/// The number of sessions removed
#[instrument(skip(pool))]
pub fn delete_expired_sessions(pool: &DbPool) -> Result<usize> {
    let conn = &mut pool.get()?;

    let deleted = diesel::delete(sessions::table.filter(sessions::expires_at.le(Utc::now())))
        .execute(conn)?;

    if deleted > 0 {
        info!("Removed {} expired sessions", deleted);
    }
    Ok(deleted)
}
