use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::{info, instrument};

use crate::auth::{hash_password, session_cookie, verify_password, AuthUser, SESSION_COOKIE};
use crate::dto::{LoginDto, RegisterDto, ValidatedJson};
use crate::errors::ApiError;
use crate::models::User;
use crate::{repo, AppState};

/// Handler for creating an account
///
/// This function handles POST requests to `/api/register`. The new user is
/// logged in straight away.
///
/// ### Arguments
///
/// * `state` - The application state
/// * `jar` - The request cookies, returned with the session cookie added
/// * `payload` - Username, password and optional grade
///
/// ### Returns
///
/// 201 with the created user as JSON
///
/// ### Errors
///
/// `DuplicateUsername` if the name is taken, `Validation` for a bad payload
#[instrument(skip(state, jar, payload), fields(username = %payload.username))]
pub async fn register_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<RegisterDto>,
) -> Result<(StatusCode, CookieJar, Json<User>), ApiError> {
    let username = payload.username.trim();
    let password_hash = hash_password(&payload.password).map_err(ApiError::Database)?;

    let user = repo::create_user(&state.pool, username, &password_hash, payload.grade)?;
    let session = repo::create_session(&state.pool, user.get_id(), state.session_ttl)
        .map_err(ApiError::Database)?;

    info!("Registered user {}", user.get_id());
    let jar = jar.add(session_cookie(session.get_token()));
    Ok((StatusCode::CREATED, jar, Json(user)))
}

/// Handler for logging in
///
/// This function handles POST requests to `/api/login`.
///
/// ### Returns
///
/// The user as JSON, with a fresh session cookie
///
/// ### Errors
///
/// `InvalidCredentials` for an unknown user or a wrong password
#[instrument(skip(state, jar, payload), fields(username = %payload.username))]
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LoginDto>,
) -> Result<(CookieJar, Json<User>), ApiError> {
    let user = repo::get_user_by_username(&state.pool, payload.username.trim())
        .map_err(ApiError::Database)?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&payload.password, user.get_password_hash()) {
        info!("Rejected login for user {}", user.get_id());
        return Err(ApiError::InvalidCredentials);
    }

    let session = repo::create_session(&state.pool, user.get_id(), state.session_ttl)
        .map_err(ApiError::Database)?;

    info!("User {} logged in", user.get_id());
    Ok((jar.add(session_cookie(session.get_token())), Json(user)))
}

/// Handler for logging out
///
/// This function handles POST requests to `/api/logout`. The session is
/// deleted and the cookie cleared.
#[instrument(skip_all, fields(user_id = %auth.user.get_id()))]
pub async fn logout_handler(
    auth: AuthUser,
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<serde_json::Value>), ApiError> {
    repo::delete_session(&state.pool, &auth.session_token).map_err(ApiError::Database)?;

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Ok((jar, Json(serde_json::json!({}))))
}

/// Handler for `GET /api/user`, returning the acting user
pub async fn current_user_handler(auth: AuthUser) -> Json<User> {
    Json(auth.user)
}
