//! Authentication
//!
//! Password hashing, session cookies, and the [`AuthUser`] extractor that
//! every protected handler takes. A request is authenticated when it carries
//! the token of an unexpired session, either in the `sid` cookie or in an
//! `Authorization: Bearer` header.

use std::sync::Arc;

use anyhow::anyhow;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header::AUTHORIZATION, request::Parts, HeaderMap};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{debug, warn};

use crate::db::DbPool;
use crate::errors::ApiError;
use crate::models::User;
use crate::repo;

/// Name of the cookie that carries the session token
pub const SESSION_COOKIE: &str = "sid";

/// Hashes a password with argon2id and a fresh random salt
///
/// The result is a PHC string (`$argon2id$v=19$...`) carrying its own
/// parameters and salt.
///
/// ### Errors
///
/// Returns an error if the salt cannot be encoded or hashing fails.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::encode_b64(&rand::random::<[u8; 16]>())
        .map_err(|e| anyhow!("Failed to encode password salt: {}", e))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Checks a password against a PHC string produced by [`hash_password`]
///
/// Malformed stored values never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let parsed = match PasswordHash::new(stored) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Stored password hash is malformed: {}", e);
            return false;
        }
    };
    Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
}

/// Builds the cookie that hands a session token to the browser
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Finds the session token in a request, preferring the bearer header
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string);

    bearer.or_else(|| {
        CookieJar::from_headers(headers)
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty())
    })
}

/// The user acting on a request, resolved from its session
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub session_token: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    Arc<DbPool>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers).ok_or(ApiError::Unauthorized)?;
        let pool = Arc::<DbPool>::from_ref(state);

        let session = repo::get_active_session(&pool, &token)?
            .ok_or_else(|| {
                debug!("Rejected unknown or expired session");
                ApiError::Unauthorized
            })?;

        let user = repo::get_user(&pool, session.get_user_id())?
            .ok_or_else(|| {
                warn!("Session refers to missing user {}", session.get_user_id());
                ApiError::Unauthorized
            })?;

        Ok(Self { user, session_token: token })
    }
}

#[cfg(test)]
mod tests;
