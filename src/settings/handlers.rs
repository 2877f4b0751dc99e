// src/settings/handlers.rs

use axum::extract::{Extension, Json};
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::models::{ChangePasswordRequest, UpdateProfileRequest};
use super::validators::ProfileValidator;
use crate::auth::cookie::{clear_session_cookie, set_cookie_header};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::{AuthedUser, User};
use crate::common::{safe_email_log, ApiError, AppState, Validator};

/// Owner-safe user fields for API responses
fn profile_json(user: &User) -> serde_json::Value {
    serde_json::json!({
        "id": user.id,
        "email": user.email,
        "name": user.name,
        "avatar": user.avatar,
        "provider": user.provider,
        "created_at": user.created_at,
    })
}

/// GET /api/settings/profile - Current user's profile
pub async fn get_profile(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&authed.id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    Ok(Json(serde_json::json!({ "user": profile_json(&user) })))
}

/// PUT /api/settings/profile - Update name and/or avatar
pub async fn update_profile(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = ProfileValidator.validate(&request);
    if !validation_result.is_valid {
        warn!(
            user_id = %authed.id,
            errors = ?validation_result.errors,
            "Profile update validation failed"
        );
        return Err(ApiError::from(validation_result));
    }

    sqlx::query(
        r#"
        UPDATE users
        SET name = COALESCE(?, name),
            avatar = COALESCE(?, avatar),
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(request.name.as_deref())
    .bind(request.avatar.as_deref())
    .bind(&authed.id)
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, user_id = %authed.id, "Database error updating profile");
        ApiError::DatabaseError(e)
    })?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&authed.id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.id, "Profile updated");

    Ok(Json(serde_json::json!({ "user": profile_json(&user) })))
}

/// PUT /api/settings/password - Change the account password
///
/// Requires the current password. OAuth-only accounts have nothing to
/// change and get a 400.
pub async fn change_password(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&authed.id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let current_hash = match &user.password_hash {
        Some(h) => h,
        None => {
            warn!(user_id = %authed.id, "Password change rejected: OAuth-only account");
            return Err(ApiError::BadRequest(
                "account has no password; sign in with your provider".to_string(),
            ));
        }
    };

    if !verify_password(&request.current_password, current_hash)? {
        warn!(user_id = %authed.id, "Password change rejected: wrong current password");
        return Err(ApiError::Unauthorized(
            "current password is incorrect".to_string(),
        ));
    }

    // hash_password enforces the minimum length on the new password
    let new_hash = hash_password(&request.new_password)?;

    sqlx::query("UPDATE users SET password_hash = ?, updated_at = datetime('now') WHERE id = ?")
        .bind(&new_hash)
        .bind(&authed.id)
        .execute(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %authed.id, "Database error changing password");
            ApiError::DatabaseError(e)
        })?;

    info!(user_id = %authed.id, "Password changed");

    Ok(Json(serde_json::json!({ "message": "Password changed" })))
}

/// DELETE /api/settings/account - Delete the account and all entries
///
/// The session cookie is cleared in the same response; the token it held
/// no longer refers to anything.
pub async fn delete_account(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Response, ApiError> {
    let state = state_lock.read().await.clone();

    sqlx::query("DELETE FROM entries WHERE user_id = ?")
        .bind(&authed.id)
        .execute(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %authed.id, "Database error deleting user entries");
            ApiError::DatabaseError(e)
        })?;

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(&authed.id)
        .execute(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %authed.id, "Database error deleting user");
            ApiError::DatabaseError(e)
        })?;

    info!(
        user_id = %authed.id,
        email = %safe_email_log(&authed.email),
        "Account deleted"
    );

    let cookie = clear_session_cookie();
    let value = set_cookie_header(&cookie)
        .ok_or_else(|| ApiError::InternalServer("failed to build session cookie".to_string()))?;

    let mut response =
        Json(serde_json::json!({ "message": "Account deleted" })).into_response();
    response.headers_mut().append(SET_COOKIE, value);
    Ok(response)
}
