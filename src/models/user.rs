//! Portal user profile joined with its role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Row from `users LEFT JOIN roles`. Profile fields are nullable in the
/// hosted schema, so every one of them is optional here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub avatar_url: Option<String>,
    pub role_id: Option<Uuid>,
    pub role_name: Option<String>,
    pub role_level: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Query filters for the user directory.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UserFilters {
    pub role: Option<String>,
    pub department: Option<String>,
}

/// Profile edit. Absent fields keep their stored values.
#[derive(Debug, Clone, Deserialize, Default, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub role_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100))]
    pub department: Option<String>,
    #[validate(length(max = 200))]
    pub position: Option<String>,
}
