//! Messages between the national council and the regional councils.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;

use crate::{AppState, error::ApiError, middleware::AuthUser};
use declara_core::messages::{Message, MessageKind};
use declara_shared::types::MessageId;

/// Creates the message routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/messages", get(list_messages).post(send_message))
        .route("/messages/{id}/read", post(mark_read))
}

/// Request body for sending a message.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// Message text.
    pub content: String,
    /// Direction; defaults to the one allowed for the sender's council.
    #[serde(default)]
    pub kind: Option<MessageKind>,
}

/// GET `/messages`
async fn list_messages(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = state.messages.list(&auth.principal()).await?;
    Ok(Json(messages))
}

/// POST `/messages`
async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let principal = auth.principal();
    let kind = payload
        .kind
        .unwrap_or_else(|| MessageKind::sent_by(principal.organization_type));

    let message = state
        .messages
        .send(&principal, kind, &payload.content, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// POST `/messages/{id}/read`
async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<MessageId>,
) -> Result<StatusCode, ApiError> {
    state.messages.mark_read(&auth.principal(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
