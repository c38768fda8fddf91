use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tracing::debug;

use crate::{
    error::{AppError, AppResult},
    message::{ChatRequest, ChatResponse, HealthResponse},
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let Json(payload) = payload?;

    if payload.message.is_empty() {
        return Err(AppError::BadRequest("Message is required".to_string()));
    }

    // Whitespace-only input is still a message; it echoes as an empty tail.
    let message = payload.message.trim();
    debug!(len = message.len(), "answering chat message");
    let reply = state.responder.reply(message);

    Ok(Json(ChatResponse::success(reply)))
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
