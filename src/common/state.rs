// Application state shared across all modules

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::auth::token::TokenService;
use crate::services::{GoogleOAuthService, OAuthStateStore};

/// Application state containing database pool and services
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub token_service: Arc<TokenService>,
    pub google_service: Arc<GoogleOAuthService>,
    pub oauth_states: Arc<OAuthStateStore>,
}
