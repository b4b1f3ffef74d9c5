//! Role-level access control extractors for Axum handlers.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};

use crate::errors::AppError;
use crate::middleware::auth::RequestContext;
use crate::services::access;
use crate::AppState;

/// Extractor that requires an Administrator-level role.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub RequestContext);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = RequestContext::from_request_parts(parts, state).await?;
        if !access::can_manage_roles(&ctx) {
            return Err(AppError::Forbidden(
                "Unauthorized - Admin access required".to_string(),
            ));
        }
        Ok(RequireAdmin(ctx))
    }
}

/// Extractor that requires VP level or above (may publish documents).
#[derive(Debug, Clone)]
pub struct RequirePublisher(pub RequestContext);

impl FromRequestParts<AppState> for RequirePublisher {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = RequestContext::from_request_parts(parts, state).await?;
        if !access::can_upload_document(&ctx) {
            return Err(AppError::Forbidden(
                "Insufficient permissions. Only VP and above can publish.".to_string(),
            ));
        }
        Ok(RequirePublisher(ctx))
    }
}
