//! Authentication data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// JWT claims structure for the session token
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Claims {
    /// User id the token was issued for
    pub sub: String,
    pub email: String,
    /// Issued-at, seconds since epoch
    pub iat: usize,
    /// Expiry, seconds since epoch
    pub exp: usize,
}

/// User database model
///
/// password_hash stays out of every serialized response.
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub provider: Option<String>,
    pub provider_id: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// POST /api/auth/signup request body
#[derive(Deserialize, Debug)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

/// POST /api/auth/login request body
#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Query parameters Google sends to the OAuth callback
#[derive(Deserialize, Debug)]
pub struct GoogleCallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}
