//! Analytics routes backing the admin dashboard.

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::middleware::auth::RequestContext;
use crate::services::announcement_analytics::{self, AnnouncementAnalytics};
use crate::services::document_analytics::{self, DocumentAnalytics, PgDocumentAnalytics};
use crate::AppState;

/// GET /api/v1/analytics/announcements — read-rate report over the window.
pub async fn announcements(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<AnnouncementAnalytics>, AppError> {
    tracing::debug!(user_id = %ctx.user_id, "Announcement analytics requested");
    let report = announcement_analytics::get_analytics(&state.db, state.config.analytics_window_months)
        .await
        .map_err(|e| e.public_message("Failed to fetch announcement analytics"))?;
    Ok(Json(report))
}

/// GET /api/v1/analytics/documents — engagement report over all documents.
pub async fn documents(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<DocumentAnalytics>, AppError> {
    tracing::debug!(user_id = %ctx.user_id, "Document analytics requested");
    let source = PgDocumentAnalytics::new(&state.db);
    let report = document_analytics::get_analytics(&source)
        .await
        .map_err(|e| e.public_message("Failed to fetch document analytics"))?;
    Ok(Json(report))
}
