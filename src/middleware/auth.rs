//! Session extractor building the request-scoped identity for handlers.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::role;
use crate::services::auth as auth_service;
use crate::AppState;

/// Authenticated caller, resolved once per request from the session token
/// and the `users`/`roles` tables.
///
/// Use as an Axum extractor in handlers that require authentication:
/// ```ignore
/// async fn handler(ctx: RequestContext) -> impl IntoResponse { ... }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub name: Option<String>,
    pub department: Option<String>,
    pub role_name: Option<String>,
    pub role_level: Option<i32>,
}

impl RequestContext {
    /// Numeric privilege level; users without a role rank below every tier.
    pub fn level(&self) -> i32 {
        self.role_level
            .or_else(|| self.role_name.as_deref().map(role::level_for_name))
            .unwrap_or(role::UNKNOWN_LEVEL)
    }

    pub fn is_admin(&self) -> bool {
        self.level() <= 1 || self.role_name.as_deref() == Some(role::ADMINISTRATOR)
    }
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = auth_service::extract_token(&parts.headers, &state.config.session_cookie_name)
            .ok_or(AppError::Unauthorized)?;

        let claims = auth_service::validate_token(
            &token,
            &state.config.auth_jwt_secret,
            &state.config.auth_jwt_audience,
        )?;

        auth_service::load_context(&state.db, &claims).await
    }
}
