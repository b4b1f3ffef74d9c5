use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::middleware::auth::RequestContext;
use crate::models::user::{UpdateUser, UserFilters, UserProfile};
use crate::services::user as user_service;
use crate::AppState;

/// GET /api/v1/users — user directory.
pub async fn list(
    State(state): State<AppState>,
    _ctx: RequestContext,
    Query(filters): Query<UserFilters>,
) -> Result<Json<Vec<UserProfile>>, AppError> {
    Ok(Json(user_service::list(&state.db, &filters).await?))
}

/// GET /api/v1/me — the caller's own profile.
pub async fn me(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(user_service::find_by_id(&state.db, ctx.user_id).await?))
}

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(user_service::find_by_id(&state.db, id).await?))
}

/// PATCH /api/v1/users/{id} — own profile, or anyone's for administrators.
pub async fn update(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUser>,
) -> Result<Json<UserProfile>, AppError> {
    body.validate()?;
    let profile = user_service::update(&state.db, &ctx, id, &body).await?;
    Ok(Json(profile))
}
