// src/common/config.rs
//! Process configuration loaded once at startup
//!
//! All secrets and OAuth identifiers come from the environment. The struct
//! is built once in `main()` and handed to the services that need it, so
//! tests can construct their own configurations without touching the
//! process environment.

use std::env;
use tracing::warn;

/// Placeholder used when JWT_SECRET is unset. Operational risk: tokens
/// signed with this value are forgeable by anyone reading the source.
pub const JWT_SECRET_PLACEHOLDER: &str = "replace_with_strong_secret";

/// Immutable application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub google_redirect_uri: Option<String>,
    pub cors_origins: String,
    pub port: u16,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(s) if !s.trim().is_empty() => s,
            _ => {
                warn!("JWT_SECRET not set, falling back to placeholder secret");
                JWT_SECRET_PLACEHOLDER.to_string()
            }
        };

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://diary.db".to_string()),
            jwt_secret,
            google_client_id: env::var("GOOGLE_CLIENT_ID").ok(),
            google_client_secret: env::var("GOOGLE_CLIENT_SECRET").ok(),
            google_redirect_uri: env::var("GOOGLE_REDIRECT_URI").ok(),
            cors_origins: env::var("CORS_ORIGINS").unwrap_or_else(|_| {
                "http://localhost:3000,http://localhost:5173".to_string()
            }),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8080),
        }
    }
}

#[cfg(test)]
impl Default for AppConfig {
    /// Test configuration: no OAuth credentials, throwaway secret
    fn default() -> Self {
        Self {
            database_url: "sqlite://:memory:".to_string(),
            jwt_secret: "test_secret_key".to_string(),
            google_client_id: None,
            google_client_secret: None,
            google_redirect_uri: None,
            cors_origins: String::new(),
            port: 0,
        }
    }
}
