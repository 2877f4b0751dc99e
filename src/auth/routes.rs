//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /api/auth/signup` - Password signup
/// - `POST /api/auth/login` - Password login
/// - `POST /api/auth/logout` - Logout (clears session cookie)
/// - `GET /api/auth/google` - Start Google OAuth flow
/// - `GET /api/auth/google/callback` - Google OAuth callback
/// - `GET /api/me` - Get current user information
pub fn auth_routes() -> Router {
    Router::new()
        .route("/api/auth/signup", post(handlers::signup_handler))
        .route("/api/auth/login", post(handlers::login_handler))
        .route("/api/auth/logout", post(handlers::logout_handler))
        .route("/api/auth/google", get(handlers::google_oauth_start))
        .route(
            "/api/auth/google/callback",
            get(handlers::google_oauth_callback),
        )
        .route("/api/me", get(handlers::me_handler))
}
