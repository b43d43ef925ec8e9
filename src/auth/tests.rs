use super::*;
use crate::test_utils::setup_test_db;
use axum::http::{header::COOKIE, HeaderValue, Request};
use chrono::Duration;

#[test]
fn test_hash_then_verify() {
    let stored = hash_password("correct horse").unwrap();
    assert!(verify_password("correct horse", &stored));
    assert!(!verify_password("wrong horse", &stored));
}

#[test]
fn test_hash_is_salted() {
    let a = hash_password("same").unwrap();
    let b = hash_password("same").unwrap();
    assert_ne!(a, b);
    assert!(verify_password("same", &a));
    assert!(verify_password("same", &b));
}

#[test]
fn test_hash_is_argon2id_phc_string() {
    let stored = hash_password("hunter2").unwrap();
    assert!(!stored.contains("hunter2"));
    assert!(stored.starts_with("$argon2id$"));

    let parsed = PasswordHash::new(&stored).unwrap();
    assert_eq!(parsed.algorithm.as_str(), "argon2id");
    assert!(parsed.salt.is_some());
    assert!(parsed.hash.is_some());
}

#[test]
fn test_plain_sha256_digest_never_verifies() {
    // `<salt hex>$<sha256 hex>` is not a PHC string
    let legacy = format!("{}${}", "00".repeat(16), "ab".repeat(32));
    assert!(!verify_password("hunter2", &legacy));
}

#[test]
fn test_malformed_stored_hash_never_verifies() {
    assert!(!verify_password("anything", "no-separator"));
    assert!(!verify_password("", ""));
    assert!(!verify_password("pw", "$argon2id$v=19$garbage"));
}

#[test]
fn test_session_token_from_bearer_header() {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc-123"));
    assert_eq!(session_token(&headers), Some("abc-123".to_string()));
}

#[test]
fn test_session_token_from_cookie() {
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, HeaderValue::from_static("theme=dark; sid=tok-456"));
    assert_eq!(session_token(&headers), Some("tok-456".to_string()));
}

#[test]
fn test_session_token_missing() {
    let mut headers = HeaderMap::new();
    assert_eq!(session_token(&headers), None);

    headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
    assert_eq!(session_token(&headers), None);
}

#[test]
fn test_session_cookie_attributes() {
    let cookie = session_cookie("tok".to_string());
    assert_eq!(cookie.name(), SESSION_COOKIE);
    assert_eq!(cookie.value(), "tok");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.path(), Some("/"));
}

async fn extract(pool: &Arc<DbPool>, request: Request<()>) -> Result<AuthUser, ApiError> {
    let (mut parts, _) = request.into_parts();
    AuthUser::from_request_parts(&mut parts, pool).await
}

#[tokio::test]
async fn test_extractor_resolves_active_session() {
    let pool = setup_test_db();
    let user = repo::create_user(&pool, "ada", &hash_password("pw").unwrap(), Some("10".to_string())).unwrap();
    let session = repo::create_session(&pool, user.get_id(), Duration::hours(1)).unwrap();

    let request = Request::builder()
        .header(AUTHORIZATION, format!("Bearer {}", session.get_token()))
        .body(())
        .unwrap();

    let auth = extract(&pool, request).await.unwrap();
    assert_eq!(auth.user.get_id(), user.get_id());
    assert_eq!(auth.session_token, session.get_token());
}

#[tokio::test]
async fn test_extractor_rejects_missing_token() {
    let pool = setup_test_db();
    let request = Request::builder().body(()).unwrap();
    assert!(matches!(extract(&pool, request).await, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn test_extractor_rejects_unknown_token() {
    let pool = setup_test_db();
    let request = Request::builder()
        .header(COOKIE, "sid=not-a-session")
        .body(())
        .unwrap();
    assert!(matches!(extract(&pool, request).await, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn test_extractor_rejects_expired_session() {
    let pool = setup_test_db();
    let user = repo::create_user(&pool, "ada", &hash_password("pw").unwrap(), None).unwrap();
    let session = repo::create_session(&pool, user.get_id(), Duration::seconds(-5)).unwrap();

    let request = Request::builder()
        .header(AUTHORIZATION, format!("Bearer {}", session.get_token()))
        .body(())
        .unwrap();
    assert!(matches!(extract(&pool, request).await, Err(ApiError::Unauthorized)));
}
