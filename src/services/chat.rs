use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::middleware::auth::RequestContext;
use crate::models::chat::{ChatChannel, ChatMessage, CreateMessage};
use crate::services::access;

const MESSAGE_COLUMNS: &str = r#"
    m.id, m.channel_id, m.user_id, m.message, m.timestamp,
    u.name AS user_name, u.avatar_url AS user_avatar, r.name AS user_role
"#;

/// Channels the caller may join, ordered by name.
pub async fn list_channels(pool: &PgPool, ctx: &RequestContext) -> Result<Vec<ChatChannel>, AppError> {
    let channels = sqlx::query_as::<_, ChatChannel>(
        "SELECT id, name, type, required_role, department FROM chat_channels ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(channels
        .into_iter()
        .filter(|c| access::can_access_channel(ctx, c))
        .collect())
}

/// Load a channel and check the caller may use it.
pub async fn authorize_channel(
    pool: &PgPool,
    ctx: &RequestContext,
    channel_id: Uuid,
) -> Result<ChatChannel, AppError> {
    let channel = sqlx::query_as::<_, ChatChannel>(
        "SELECT id, name, type, required_role, department FROM chat_channels WHERE id = $1",
    )
    .bind(channel_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Channel not found".to_string()))?;

    if !access::can_access_channel(ctx, &channel) {
        tracing::warn!(user_id = %ctx.user_id, channel_id = %channel_id, "Channel access denied");
        return Err(AppError::Forbidden(
            "You do not have access to this channel".to_string(),
        ));
    }
    Ok(channel)
}

/// Channel history, oldest first.
pub async fn list_messages(
    pool: &PgPool,
    ctx: &RequestContext,
    channel_id: Uuid,
) -> Result<Vec<ChatMessage>, AppError> {
    let channel = authorize_channel(pool, ctx, channel_id).await?;

    let sql = format!(
        r#"
        SELECT {MESSAGE_COLUMNS}
        FROM chat_messages m
        LEFT JOIN users u ON u.id = m.user_id
        LEFT JOIN roles r ON r.id = u.role_id
        WHERE m.channel_id = $1
        ORDER BY m.timestamp ASC
        "#
    );

    let messages = sqlx::query_as::<_, ChatMessage>(&sql)
        .bind(channel.id)
        .fetch_all(pool)
        .await?;
    Ok(messages)
}

/// Post a message as the caller.
pub async fn post_message(
    pool: &PgPool,
    ctx: &RequestContext,
    channel_id: Uuid,
    input: &CreateMessage,
) -> Result<ChatMessage, AppError> {
    let channel = authorize_channel(pool, ctx, channel_id).await?;

    let text = input.message.trim();
    if text.is_empty() {
        return Err(AppError::Validation("message cannot be blank".to_string()));
    }

    let sql = format!(
        r#"
        WITH m AS (
            INSERT INTO chat_messages (channel_id, user_id, message, timestamp)
            VALUES ($1, $2, $3, NOW())
            RETURNING *
        )
        SELECT {MESSAGE_COLUMNS}
        FROM m
        LEFT JOIN users u ON u.id = m.user_id
        LEFT JOIN roles r ON r.id = u.role_id
        "#
    );

    let message = sqlx::query_as::<_, ChatMessage>(&sql)
        .bind(channel.id)
        .bind(ctx.user_id)
        .bind(text)
        .fetch_one(pool)
        .await?;

    tracing::debug!(channel_id = %channel.id, message_id = %message.id, "Chat message posted");
    Ok(message)
}
