// src/entries/routes.rs

use axum::{routing::get, Router};

use super::handlers;

/// Creates and returns the diary entries router
///
/// # Routes
/// - `GET /api/diary` - List own entries (cursor pagination)
/// - `POST /api/diary` - Create entry
/// - `GET /api/diary/:id` - Read entry
/// - `PUT /api/diary/:id` - Update entry
/// - `DELETE /api/diary/:id` - Delete entry
pub fn entries_routes() -> Router {
    Router::new()
        .route(
            "/api/diary",
            get(handlers::list_entries).post(handlers::create_entry),
        )
        .route(
            "/api/diary/:id",
            get(handlers::get_entry)
                .put(handlers::update_entry)
                .delete(handlers::delete_entry),
        )
}
