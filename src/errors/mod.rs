//! Unified error handling with a consistent JSON error body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// JSON body returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
}

impl ErrorBody {
    pub fn new(code: &str, message: &str) -> Json<Self> {
        Json(Self {
            error: message.to_string(),
            code: code.to_string(),
        })
    }
}

/// Application error type mapping to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    /// A backend fetch failed; the message is safe to show to clients.
    #[error("Upstream failure: {0}")]
    Upstream(String),
}

impl AppError {
    /// Replace a server-side failure with a route-specific public message.
    ///
    /// Client errors (4xx) pass through untouched so that auth and validation
    /// failures keep their status codes.
    pub fn public_message(self, message: &str) -> Self {
        match self {
            Self::Database(_) | Self::Internal(_) | Self::Upstream(_) => {
                tracing::error!(error = %self, "{message}");
                Self::Upstream(message.to_string())
            }
            other => other,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Upstream(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "UPSTREAM_ERROR",
                msg.clone(),
            ),
        };

        (status, ErrorBody::new(code, &message)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_shape() {
        let body = ErrorBody::new("NOT_FOUND", "Role not found");
        let json = serde_json::to_value(&body.0).unwrap();
        assert_eq!(json["error"], "Role not found");
        assert_eq!(json["code"], "NOT_FOUND");
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = AppError::NotFound("Role not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn app_error_display() {
        let err = AppError::Validation("title is required".to_string());
        assert_eq!(err.to_string(), "Validation error: title is required");
    }

    #[test]
    fn app_error_from_sqlx() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[test]
    fn public_message_replaces_server_errors() {
        let err = AppError::Database(sqlx::Error::PoolTimedOut)
            .public_message("Failed to fetch announcement analytics");
        match err {
            AppError::Upstream(msg) => assert_eq!(msg, "Failed to fetch announcement analytics"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn public_message_keeps_client_errors() {
        let err = AppError::Unauthorized.public_message("Failed to fetch roles");
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn upstream_maps_to_500() {
        let response = AppError::Upstream("Failed to fetch document analytics".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
