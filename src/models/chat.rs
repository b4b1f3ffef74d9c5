//! Role-gated chat channels and their messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChatChannel {
    pub id: Uuid,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub channel_type: String,
    /// Least privileged role name allowed into the channel.
    pub required_role: Option<String>,
    /// When set, only members of this department may join.
    pub department: Option<String>,
}

/// Message row joined with the sender's profile and role.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChatMessage {
    pub id: Uuid,
    pub channel_id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub user_name: Option<String>,
    pub user_avatar: Option<String>,
    pub user_role: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMessage {
    #[validate(length(min = 1, max = 4000))]
    pub message: String,
}
