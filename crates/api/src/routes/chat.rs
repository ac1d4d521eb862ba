//! Internal staff chat routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use pelita_db::ChatRepository;
use pelita_shared::types::{PageRequest, PageResponse};

/// Creates the chat router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/chat/messages", post(send_message))
        .route("/chat/with/{user_id}", get(conversation))
        .route("/chat/with/{user_id}/read", post(mark_read))
        .route("/chat/unread", get(unread_count))
}

#[derive(Debug, Deserialize)]
struct SendMessageRequest {
    recipient_id: Uuid,
    body: String,
}

/// POST /chat/messages - Send a message.
async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ChatRepository::new((*state.db).clone());
    let message = repo
        .send(auth.user_id(), payload.recipient_id, &payload.body)
        .await?;

    Ok((StatusCode::CREATED, Json(message)))
}

/// GET /chat/with/{user_id} - Conversation with another user.
async fn conversation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ChatRepository::new((*state.db).clone());
    let (rows, total) = repo.conversation(auth.user_id(), user_id, &page).await?;

    Ok(Json(PageResponse::new(rows, page.page, page.per_page, total)))
}

/// POST /chat/with/{user_id}/read - Mark that user's messages as read.
async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ChatRepository::new((*state.db).clone());
    let marked = repo.mark_read(auth.user_id(), user_id).await?;

    Ok(Json(json!({ "marked_read": marked })))
}

/// GET /chat/unread - Count of unread messages for the current user.
async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ChatRepository::new((*state.db).clone());
    let count = repo.unread_count(auth.user_id()).await?;

    Ok(Json(json!({ "unread": count })))
}
