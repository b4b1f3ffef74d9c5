//! Shared documents and the rows the analytics aggregator reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Document metadata row joined with the uploader's name. File bytes live
/// in object storage behind `content_url`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub id: Uuid,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub doc_type: String,
    pub size: Option<String>,
    pub content_url: Option<String>,
    pub uploaded_by: Option<Uuid>,
    pub uploaded_by_name: Option<String>,
    pub department: Option<String>,
    pub departments: Option<Vec<String>>,
    /// Legacy single access tier (a role name).
    pub access_level: Option<String>,
    /// Explicit list of role names allowed to see the document.
    pub access_levels: Option<Vec<String>>,
    pub downloads: i64,
    pub views: i64,
    pub shared: bool,
    pub created_at: DateTime<Utc>,
}

/// Row from the `document_analytics` reporting view.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentViewRow {
    pub id: Uuid,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub read_count: i64,
    pub download_count: i64,
    pub document_type: Option<String>,
}

/// Raw `documents` row with denormalized counters, used when the view is
/// unavailable.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentCounterRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub reads: i64,
    pub downloads: i64,
    pub document_type: Option<String>,
}
