// src/settings/routes.rs

use axum::{
    routing::{delete, get, put},
    Router,
};

use super::handlers;

/// Creates and returns the account settings router
///
/// # Routes
/// - `GET /api/settings/profile` - Current user's profile
/// - `PUT /api/settings/profile` - Update name/avatar
/// - `PUT /api/settings/password` - Change password
/// - `DELETE /api/settings/account` - Delete account and entries
pub fn settings_routes() -> Router {
    Router::new()
        .route(
            "/api/settings/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route("/api/settings/password", put(handlers::change_password))
        .route("/api/settings/account", delete(handlers::delete_account))
}
