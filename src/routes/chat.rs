//! Chat routes: channel list and per-channel messages.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::middleware::auth::RequestContext;
use crate::models::chat::{ChatChannel, ChatMessage, CreateMessage};
use crate::services::chat as chat_service;
use crate::AppState;

/// GET /api/v1/chat/channels — channels the caller may join.
pub async fn channels(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Vec<ChatChannel>>, AppError> {
    let channels = chat_service::list_channels(&state.db, &ctx).await?;
    Ok(Json(channels))
}

/// GET /api/v1/chat/{channel_id}/messages — channel history.
pub async fn messages(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(channel_id): Path<Uuid>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let messages = chat_service::list_messages(&state.db, &ctx, channel_id).await?;
    Ok(Json(messages))
}

/// POST /api/v1/chat/{channel_id}/messages — post to a channel.
pub async fn post_message(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(channel_id): Path<Uuid>,
    Json(body): Json<CreateMessage>,
) -> Result<(StatusCode, Json<ChatMessage>), AppError> {
    body.validate()?;
    let message = chat_service::post_message(&state.db, &ctx, channel_id, &body).await?;
    Ok((StatusCode::CREATED, Json(message)))
}
