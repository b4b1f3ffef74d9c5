//! Session validation against the hosted auth server and profile loading.
//!
//! Sessions are issued elsewhere; this service only verifies the HS256
//! access token the auth server signed and resolves the caller's profile.

use axum::http::{header, HeaderMap};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::middleware::auth::RequestContext;
use crate::models::user::UserProfile;

/// Claims carried by access tokens from the hosted auth server.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Auth user id; matches `users.id`.
    pub sub: String,
    pub email: Option<String>,
    /// Auth-level role such as `authenticated`; unrelated to portal roles.
    pub role: Option<String>,
    pub aud: String,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

/// Pull the access token from the `Authorization` header, falling back to
/// the session cookie set by the web client.
pub fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    if bearer.is_some() {
        return bearer;
    }

    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
}

/// Validate a session JWT and return the claims.
pub fn validate_token(token: &str, jwt_secret: &str, audience: &str) -> Result<Claims, AppError> {
    let decoding_key = DecodingKey::from_secret(jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[audience]);

    jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected session token");
            AppError::Unauthorized
        })
}

/// Find a user profile with its role by ID.
pub async fn find_profile(pool: &PgPool, id: Uuid) -> Result<Option<UserProfile>, AppError> {
    let profile = sqlx::query_as::<_, UserProfile>(
        r#"
        SELECT u.id, u.name, u.email, u.department, u.position, u.avatar_url,
               u.role_id, r.name AS role_name, r.level AS role_level, u.created_at
        FROM users u
        LEFT JOIN roles r ON r.id = u.role_id
        WHERE u.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(profile)
}

/// Build the request-scoped context for a validated session.
pub async fn load_context(pool: &PgPool, claims: &Claims) -> Result<RequestContext, AppError> {
    let user_id: Uuid = claims.sub.parse().map_err(|_| AppError::Unauthorized)?;
    let profile = find_profile(pool, user_id).await?;
    context_from_profile(claims, profile)
}

/// A session without a portal profile is not a usable session.
pub fn context_from_profile(
    claims: &Claims,
    profile: Option<UserProfile>,
) -> Result<RequestContext, AppError> {
    let profile = profile.ok_or_else(|| {
        tracing::debug!(sub = %claims.sub, "Session has no user profile");
        AppError::Unauthorized
    })?;

    Ok(RequestContext {
        user_id: profile.id,
        email: profile.email.or_else(|| claims.email.clone()),
        name: profile.name,
        department: profile.department,
        role_name: profile.role_name,
        role_level: profile.role_level,
    })
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header};

    use super::*;

    const SECRET: &str = "test-secret-key-for-jwt";

    fn token(aud: &str, expires_in: i64) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            email: Some("officer@corp.test".to_string()),
            role: Some("authenticated".to_string()),
            aud: aud.to_string(),
            exp: (now + Duration::seconds(expires_in)).timestamp(),
            iat: now.timestamp(),
        };
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_accepted() {
        let claims = validate_token(&token("authenticated", 900), SECRET, "authenticated").unwrap();
        assert_eq!(claims.email.as_deref(), Some("officer@corp.test"));
        assert!(claims.sub.parse::<Uuid>().is_ok());
    }

    #[test]
    fn wrong_audience_rejected() {
        let result = validate_token(&token("anon", 900), SECRET, "authenticated");
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn wrong_secret_rejected() {
        let result = validate_token(&token("authenticated", 900), "other-secret", "authenticated");
        assert!(result.is_err());
    }

    #[test]
    fn expired_token_rejected() {
        // Well beyond the default 60s leeway.
        let result = validate_token(&token("authenticated", -3600), SECRET, "authenticated");
        assert!(result.is_err());
    }

    #[test]
    fn invalid_token_rejected() {
        assert!(validate_token("garbage.token.here", SECRET, "authenticated").is_err());
    }

    #[test]
    fn bearer_header_preferred_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("sb-access-token=xyz"));
        assert_eq!(extract_token(&headers, "sb-access-token").as_deref(), Some("abc"));
    }

    #[test]
    fn cookie_used_without_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; sb-access-token=xyz"));
        assert_eq!(extract_token(&headers, "sb-access-token").as_deref(), Some("xyz"));
    }

    fn claims_for(id: Uuid) -> Claims {
        Claims {
            sub: id.to_string(),
            email: Some("session@corp.test".to_string()),
            role: None,
            aud: "authenticated".to_string(),
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn session_without_profile_is_unauthorized() {
        let result = context_from_profile(&claims_for(Uuid::new_v4()), None);
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn profile_email_falls_back_to_claims() {
        let id = Uuid::new_v4();
        let profile = UserProfile {
            id,
            name: Some("Dana".to_string()),
            email: None,
            department: Some("IT".to_string()),
            position: None,
            avatar_url: None,
            role_id: None,
            role_name: Some("VP".to_string()),
            role_level: Some(3),
            created_at: None,
        };

        let ctx = context_from_profile(&claims_for(id), Some(profile)).unwrap();
        assert_eq!(ctx.user_id, id);
        assert_eq!(ctx.email.as_deref(), Some("session@corp.test"));
        assert_eq!(ctx.level(), 3);
    }

    #[test]
    fn missing_token_is_none() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic Zm9vOmJhcg=="));
        assert!(extract_token(&headers, "sb-access-token").is_none());
    }
}
