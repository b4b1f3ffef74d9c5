use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    /// Shared secret the hosted auth server signs session tokens with.
    pub auth_jwt_secret: String,
    pub auth_jwt_audience: String,
    pub session_cookie_name: String,
    pub frontend_url: String,
    pub analytics_window_months: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("BACKEND_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            auth_jwt_secret: env::var("AUTH_JWT_SECRET")?,
            auth_jwt_audience: env::var("AUTH_JWT_AUDIENCE")
                .unwrap_or_else(|_| "authenticated".to_string()),
            session_cookie_name: env::var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|_| "sb-access-token".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3001".to_string()),
            analytics_window_months: env::var("ANALYTICS_WINDOW_MONTHS")
                .unwrap_or_else(|_| "6".to_string())
                .parse()
                .unwrap_or(6),
        })
    }
}
