//! Authentication handlers

use axum::extract::{Extension, Json, Query};
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::cookie::{clear_session_cookie, session_cookie, set_cookie_header};
use super::extractors::AuthedUser;
use super::models::{GoogleCallbackParams, LoginRequest, SignupRequest, User};
use super::password::{hash_password, verify_password};
use super::validators::{LoginValidator, SignupValidator};
use crate::common::{generate_user_id, safe_email_log, ApiError, AppState, Validator};
use crate::services::GoogleUserInfo;

/// Owner-safe user fields for API responses
fn user_json(user: &User) -> serde_json::Value {
    serde_json::json!({
        "id": user.id,
        "email": user.email,
        "name": user.name,
        "avatar": user.avatar,
        "provider": user.provider,
    })
}

/// Attach the session cookie to a JSON response
fn session_response(token: &str, body: serde_json::Value) -> Result<Response, ApiError> {
    let cookie = session_cookie(token);
    let value = set_cookie_header(&cookie)
        .ok_or_else(|| ApiError::InternalServer("failed to build session cookie".to_string()))?;

    let mut response = Json(body).into_response();
    response.headers_mut().append(SET_COOKIE, value);
    Ok(response)
}

/// POST /api/auth/signup
/// Creates a password account and starts a session
///
/// # Request Body
/// ```json
/// {
///   "email": "user@example.com",
///   "password": "at least 8 chars",
///   "name": "optional"
/// }
/// ```
pub async fn signup_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<SignupRequest>,
) -> Result<Response, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = SignupValidator.validate(&payload);
    if !validation_result.is_valid {
        warn!(
            email = %safe_email_log(&payload.email),
            errors = ?validation_result.errors,
            "Signup validation failed"
        );
        return Err(ApiError::from(validation_result));
    }

    let email = payload.email.trim().to_lowercase();

    // Reject duplicate accounts up front
    let existing: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if existing.is_some() {
        warn!(email = %safe_email_log(&email), "Signup rejected: email already in use");
        return Err(ApiError::BadRequest("email already in use".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;
    let id = generate_user_id();

    sqlx::query(
        "INSERT INTO users (id, email, name, password_hash) VALUES (?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&email)
    .bind(payload.name.as_deref())
    .bind(&password_hash)
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(
            error = %e,
            user_id = %id,
            email = %safe_email_log(&email),
            "Database error inserting new user during signup"
        );
        ApiError::DatabaseError(e)
    })?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let token = state
        .token_service
        .sign(&user.id, &user.email)
        .map_err(|e| {
            error!(error = %e, user_id = %user.id, "JWT signing error during signup");
            ApiError::InternalServer("jwt error".to_string())
        })?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        "New user account created via signup"
    );

    session_response(&token, serde_json::json!({ "user": user_json(&user) }))
}

/// POST /api/auth/login
/// Verifies credentials and starts a session
///
/// All credential failures return the same generic 401 body.
pub async fn login_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = LoginValidator.validate(&payload);
    if !validation_result.is_valid {
        return Err(ApiError::from(validation_result));
    }

    let email = payload.email.trim().to_lowercase();

    let user: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let user = match user {
        Some(u) => u,
        None => {
            warn!(email = %safe_email_log(&email), "Login failed: unknown email");
            return Err(ApiError::Unauthorized("invalid email or password".to_string()));
        }
    };

    // OAuth-only accounts have no password to check
    let password_hash = match &user.password_hash {
        Some(h) => h,
        None => {
            warn!(
                user_id = %user.id,
                "Login failed: account has no password (OAuth-only)"
            );
            return Err(ApiError::Unauthorized("invalid email or password".to_string()));
        }
    };

    if !verify_password(&payload.password, password_hash)? {
        warn!(user_id = %user.id, "Login failed: wrong password");
        return Err(ApiError::Unauthorized("invalid email or password".to_string()));
    }

    let token = state
        .token_service
        .sign(&user.id, &user.email)
        .map_err(|e| {
            error!(error = %e, user_id = %user.id, "JWT signing error during login");
            ApiError::InternalServer("jwt error".to_string())
        })?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        "User login successful"
    );

    session_response(&token, serde_json::json!({ "user": user_json(&user) }))
}

/// POST /api/auth/logout
/// Ends the session by clearing the auth-token cookie
pub async fn logout_handler() -> Result<Response, ApiError> {
    let cookie = clear_session_cookie();
    let value = set_cookie_header(&cookie)
        .ok_or_else(|| ApiError::InternalServer("failed to build session cookie".to_string()))?;

    info!("User logout successful");

    let mut response =
        Json(serde_json::json!({ "message": "Logout successful" })).into_response();
    response.headers_mut().append(SET_COOKIE, value);
    Ok(response)
}

/// GET /api/me
/// Returns the current authenticated user's information
pub async fn me_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&authed.id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    Ok(Json(serde_json::json!({ "user": user_json(&user) })))
}

/// GET /api/auth/google - Start Google OAuth flow
/// Issues a CSRF state and redirects (307) to Google's authorization page
pub async fn google_oauth_start(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Redirect, ApiError> {
    let state = state_lock.read().await.clone();

    let auth_request = state.google_service.authorization_url().map_err(|e| {
        error!(error = %e, "Failed to generate Google OAuth URL");
        ApiError::from(e)
    })?;

    state.oauth_states.issue(auth_request.state.clone()).await;

    info!("Redirecting to Google OAuth consent screen");
    Ok(Redirect::temporary(&auth_request.url))
}

/// GET /api/auth/google/callback - Handle OAuth callback from Google
/// Validates the CSRF state, exchanges the code, links or creates the
/// local account, and starts a session
pub async fn google_oauth_callback(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(params): Query<GoogleCallbackParams>,
) -> Result<Response, ApiError> {
    let state = state_lock.read().await.clone();

    // Provider-reported error: bounce back to login, never 500
    if let Some(error) = &params.error {
        warn!(oauth_error = %error, "Google OAuth returned an error");
        return Ok(Redirect::temporary("/auth/login?error=oauth_failed").into_response());
    }

    let code = params.code.as_deref().ok_or_else(|| {
        warn!("OAuth callback missing authorization code");
        ApiError::BadRequest("No authorization code provided".to_string())
    })?;

    // Single-use CSRF state: unknown, reused, or expired is rejected
    let state_param = params.state.as_deref().unwrap_or_default();
    if state_param.is_empty() || !state.oauth_states.consume(state_param).await {
        warn!("OAuth callback presented an unknown or reused state");
        return Err(ApiError::Unauthorized("invalid oauth state".to_string()));
    }

    debug!("OAuth state validated, exchanging authorization code");

    let token_response = state.google_service.exchange_code(code).await.map_err(|e| {
        error!(error = %e, "Failed to exchange authorization code for tokens");
        ApiError::from(e)
    })?;

    let profile = state
        .google_service
        .user_info(&token_response.access_token)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch Google user info");
            ApiError::from(e)
        })?;

    let user = find_or_create_google_user(&state, &profile).await?;

    let token = state
        .token_service
        .sign(&user.id, &user.email)
        .map_err(|e| {
            error!(error = %e, user_id = %user.id, "JWT signing error during OAuth callback");
            ApiError::InternalServer("jwt error".to_string())
        })?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        provider = "google",
        "User authentication successful via Google OAuth"
    );

    let cookie = session_cookie(&token);
    let value = set_cookie_header(&cookie)
        .ok_or_else(|| ApiError::InternalServer("failed to build session cookie".to_string()))?;

    let mut response = Redirect::temporary("/diary").into_response();
    response.headers_mut().append(SET_COOKIE, value);
    Ok(response)
}

// ---- Helper Functions ----

/// Find the local account for a Google profile, linking or creating it
///
/// Lookup order: (provider, provider_id), then email (an existing password
/// account gets the provider linked), then a fresh insert.
async fn find_or_create_google_user(
    state: &AppState,
    profile: &GoogleUserInfo,
) -> Result<User, ApiError> {
    let email = profile.email.trim().to_lowercase();

    let by_provider: Option<User> = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE provider = ? AND provider_id = ?",
    )
    .bind("google")
    .bind(&profile.sub)
    .fetch_optional(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    if let Some(user) = by_provider {
        debug!(user_id = %user.id, "Found existing Google-linked user");
        return Ok(user);
    }

    let by_email: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if let Some(user) = by_email {
        info!(
            user_id = %user.id,
            email = %safe_email_log(&email),
            "Linking existing account to Google provider"
        );
        sqlx::query(
            "UPDATE users SET provider = ?, provider_id = ?, updated_at = datetime('now') WHERE id = ?",
        )
        .bind("google")
        .bind(&profile.sub)
        .bind(&user.id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        return sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(&user.id)
            .fetch_one(&state.db)
            .await
            .map_err(ApiError::DatabaseError);
    }

    let id = generate_user_id();
    info!(
        user_id = %id,
        email = %safe_email_log(&email),
        provider = "google",
        "Creating new user account via Google OAuth"
    );

    sqlx::query(
        "INSERT INTO users (id, email, name, avatar, provider, provider_id) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&email)
    .bind(profile.name.as_deref())
    .bind(profile.picture.as_deref())
    .bind("google")
    .bind(&profile.sub)
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(
            error = %e,
            user_id = %id,
            email = %safe_email_log(&email),
            "Database error inserting new user during OAuth flow"
        );
        ApiError::DatabaseError(e)
    })?;

    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)
}
