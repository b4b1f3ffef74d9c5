//! Announcement board routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::middleware::auth::RequestContext;
use crate::middleware::rbac::RequirePublisher;
use crate::models::announcement::{
    Announcement, AnnouncementFilters, CreateAnnouncement, UpdateAnnouncement,
};
use crate::services::announcement as announcement_service;
use crate::AppState;

/// GET /api/v1/announcements — board feed, optionally for one department.
pub async fn list(
    State(state): State<AppState>,
    _ctx: RequestContext,
    Query(filters): Query<AnnouncementFilters>,
) -> Result<Json<Vec<Announcement>>, AppError> {
    let rows = announcement_service::list(&state.db, &filters).await?;
    Ok(Json(rows))
}

/// POST /api/v1/announcements — publish (VP+).
pub async fn create(
    State(state): State<AppState>,
    RequirePublisher(ctx): RequirePublisher,
    Json(body): Json<CreateAnnouncement>,
) -> Result<(StatusCode, Json<Announcement>), AppError> {
    body.validate()?;
    let announcement = announcement_service::create(&state.db, &ctx, &body).await?;
    Ok((StatusCode::CREATED, Json(announcement)))
}

/// PATCH /api/v1/announcements/{id} — edit (VP+).
pub async fn update(
    State(state): State<AppState>,
    RequirePublisher(_ctx): RequirePublisher,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateAnnouncement>,
) -> Result<Json<Announcement>, AppError> {
    body.validate()?;
    let announcement = announcement_service::update(&state.db, id, &body).await?;
    Ok(Json(announcement))
}

/// DELETE /api/v1/announcements/{id} — remove (VP+).
pub async fn delete(
    State(state): State<AppState>,
    RequirePublisher(_ctx): RequirePublisher,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    announcement_service::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
