//! Announcements and their per-user read facts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// Announcement row joined with its author's profile.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub user_id: Option<Uuid>,
    pub author: Option<String>,
    /// Legacy single target; superseded by `departments` when that is set.
    pub department: Option<String>,
    pub departments: Option<Vec<String>>,
    pub priority: String,
    pub pinned: bool,
    pub views: i32,
    pub likes: i32,
    pub comments: i32,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "authorName")]
    pub author_name: String,
    #[serde(rename = "authorAvatar")]
    pub author_avatar: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAnnouncement {
    #[validate(length(min = 1, max = 500))]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub department: Option<String>,
    pub departments: Option<Vec<String>>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Default, Validate)]
pub struct UpdateAnnouncement {
    #[validate(length(min = 1, max = 500))]
    pub title: Option<String>,
    pub content: Option<String>,
    pub departments: Option<Vec<String>>,
    pub priority: Option<Priority>,
    pub pinned: Option<bool>,
    pub tags: Option<Vec<String>>,
}

/// Query filters for the announcement board.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AnnouncementFilters {
    pub department: Option<String>,
    pub priority: Option<Priority>,
}

/// Read fact: whether `user_id` has read `announcement_id`.
#[derive(Debug, Clone, FromRow)]
pub struct AnnouncementRead {
    pub announcement_id: Uuid,
    pub user_id: Uuid,
    pub is_read: Option<bool>,
}

impl AnnouncementRead {
    /// A missing flag counts as unread.
    pub fn is_read(&self) -> bool {
        self.is_read == Some(true)
    }
}
