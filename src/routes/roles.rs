//! Role routes: readable by any member, writable by administrators.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::middleware::auth::RequestContext;
use crate::middleware::rbac::RequireAdmin;
use crate::models::role::{CreateRole, Role, UpdateRole};
use crate::services::role as role_service;
use crate::AppState;

/// GET /api/v1/roles
pub async fn list(
    State(state): State<AppState>,
    _ctx: RequestContext,
) -> Result<Json<Vec<Role>>, AppError> {
    Ok(Json(role_service::list(&state.db).await?))
}

/// GET /api/v1/roles/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<Json<Role>, AppError> {
    Ok(Json(role_service::find_by_id(&state.db, id).await?))
}

/// POST /api/v1/roles — create a role (admin).
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<CreateRole>,
) -> Result<(StatusCode, Json<Role>), AppError> {
    body.validate()?;
    let role = role_service::create(&state.db, &body).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

/// PATCH /api/v1/roles/{id} — update a role (admin).
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateRole>,
) -> Result<Json<Role>, AppError> {
    body.validate()?;
    Ok(Json(role_service::update(&state.db, id, &body).await?))
}

/// DELETE /api/v1/roles/{id} — delete a role (admin).
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    role_service::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
