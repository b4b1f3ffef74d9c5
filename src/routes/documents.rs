use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::middleware::auth::RequestContext;
use crate::services::document::{self as document_service, DocumentListing};
use crate::AppState;

/// GET /api/v1/documents — documents visible to the caller.
pub async fn list(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Vec<DocumentListing>>, AppError> {
    let documents = document_service::list_visible(&state.db, &ctx).await?;
    Ok(Json(documents))
}

/// DELETE /api/v1/documents/{id} — Senior VP+, or a VP within their department.
pub async fn delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    document_service::delete(&state.db, &ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
