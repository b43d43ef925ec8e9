use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::instrument;

use crate::auth::AuthUser;
use crate::completion::CompletionClient;
use crate::dto::{ChatRequestDto, ChatResponseDto, ValidatedJson};
use crate::errors::ApiError;

/// Handler for the study assistant
///
/// This function handles POST requests to `/api/chat`. The message is
/// forwarded verbatim as a single user turn; there is no conversation
/// history.
///
/// ### Errors
///
/// `Upstream` when the completion call fails for any reason
#[instrument(skip_all, fields(user_id = %auth.user.get_id()))]
pub async fn chat_handler(
    auth: AuthUser,
    State(completions): State<Arc<CompletionClient>>,
    ValidatedJson(payload): ValidatedJson<ChatRequestDto>,
) -> Result<Json<ChatResponseDto>, ApiError> {
    let response = completions.complete(&payload.message).await?;
    Ok(Json(ChatResponseDto { response }))
}
