//! Route definitions for the intraportal API.

pub mod analytics;
pub mod announcements;
pub mod chat;
pub mod documents;
pub mod health;
pub mod roles;
pub mod users;

use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{delete, get, patch};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Largest accepted request body (JSON payloads only; files go to object storage).
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the full application router.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.frontend_url);

    let analytics_routes = Router::new()
        .route("/analytics/announcements", get(analytics::announcements))
        .route("/analytics/documents", get(analytics::documents));

    let announcement_routes = Router::new()
        .route(
            "/announcements",
            get(announcements::list).post(announcements::create),
        )
        .route(
            "/announcements/{id}",
            patch(announcements::update).delete(announcements::delete),
        );

    let document_routes = Router::new()
        .route("/documents", get(documents::list))
        .route("/documents/{id}", delete(documents::delete));

    let chat_routes = Router::new()
        .route("/chat/channels", get(chat::channels))
        .route(
            "/chat/{channel_id}/messages",
            get(chat::messages).post(chat::post_message),
        );

    let role_routes = Router::new()
        .route("/roles", get(roles::list).post(roles::create))
        .route(
            "/roles/{id}",
            get(roles::get_by_id)
                .patch(roles::update)
                .delete(roles::delete),
        );

    let user_routes = Router::new()
        .route("/users", get(users::list))
        .route("/users/{id}", get(users::get_by_id).patch(users::update))
        .route("/me", get(users::me));

    let api_routes = Router::new()
        .merge(analytics_routes)
        .merge(announcement_routes)
        .merge(document_routes)
        .merge(chat_routes)
        .merge(role_routes)
        .merge(user_routes);

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
                .layer(cors),
        )
        .with_state(state)
}

/// CORS for the web client's origin, with cookies allowed.
fn cors_layer(frontend_url: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    match frontend_url.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin).allow_credentials(true),
        Err(e) => {
            tracing::warn!(error = %e, frontend_url, "Invalid FRONTEND_URL, cross-origin requests disabled");
            layer
        }
    }
}
