use super::*;
use axum::body::to_bytes;
use axum::response::IntoResponse;

/// Helper to extract status code and body JSON from an ApiError response
async fn error_response(error: ApiError) -> (StatusCode, serde_json::Value) {
    let response = error.into_response();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}

#[tokio::test]
async fn test_database_error_response_hides_details() {
    let error = ApiError::Database(anyhow::anyhow!("connection refused"));
    let (status, body) = error_response(error).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
}

#[tokio::test]
async fn test_upstream_error_response_hides_details() {
    let error = ApiError::Upstream(UpstreamError::MissingApiKey);
    let (status, body) = error_response(error).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to process completion request");
}

#[tokio::test]
async fn test_unauthorized_response() {
    let (status, body) = error_response(ApiError::Unauthorized).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication required");
}

#[tokio::test]
async fn test_invalid_credentials_response() {
    let (status, _) = error_response(ApiError::InvalidCredentials).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_validation_response() {
    let msg = "name must not be empty".to_string();
    let (status, body) = error_response(ApiError::Validation(msg.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], msg);
}

#[tokio::test]
async fn test_not_found_response() {
    let (status, body) = error_response(ApiError::NotFound("Subject")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Subject not found");
}

#[tokio::test]
async fn test_duplicate_username_maps_to_bad_request() {
    let error: ApiError = CreateUserError::DuplicateUsername("ada".to_string()).into();
    let (status, body) = error_response(error).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username already exists");
}

#[tokio::test]
async fn test_chapter_errors_map_to_not_found_and_internal() {
    let (status, _) = error_response(ChapterError::EmptyResult.into()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let error: ApiError = ChapterError::GenerationFailure(UpstreamError::Status(reqwest::StatusCode::BAD_GATEWAY)).into();
    let (status, _) = error_response(error).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
