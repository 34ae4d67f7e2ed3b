//! HTTP handler for the garden assistant

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::assistant::{AssistantResponse, AssistantService, ChatRequest};
use crate::AppState;

/// Answer a garden assistant chat turn
pub async fn chat(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<ChatRequest>,
) -> AppResult<Json<AssistantResponse>> {
    tracing::debug!(user_id = %current_user.0.user_id, "Assistant chat request");
    let service = AssistantService::new(
        state.config.assistant.clone(),
        state.http,
        state.config.uploads.max_photo_bytes,
    );
    let response = service.chat(request).await?;
    Ok(Json(response))
}
