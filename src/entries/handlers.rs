// src/entries/handlers.rs

use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::models::{
    CreateEntryRequest, Entry, EntryCursor, EntryPage, ListEntriesQuery, UpdateEntryRequest,
};
use super::validators::EntryValidator;
use crate::auth::AuthedUser;
use crate::common::{generate_entry_id, ApiError, AppState, Validator};

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

/// GET /api/diary - List the authenticated user's entries, newest first
///
/// Cursor pagination: the response carries an opaque next_cursor while
/// more entries exist. The query is always scoped to the session's user,
/// so a cursor lifted from another account pages through nothing.
pub async fn list_entries(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Query(query): Query<ListEntriesQuery>,
) -> Result<Json<EntryPage>, ApiError> {
    let state = state_lock.read().await.clone();

    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let cursor = match &query.cursor {
        Some(raw) => Some(
            EntryCursor::decode(raw)
                .ok_or_else(|| ApiError::BadRequest("invalid cursor".to_string()))?,
        ),
        None => None,
    };

    debug!(user_id = %authed.id, limit = limit, "Listing diary entries");

    // Fetch one row past the page to know whether another page exists
    let mut entries: Vec<Entry> = match &cursor {
        Some(c) => {
            sqlx::query_as::<_, Entry>(
                r#"
                SELECT * FROM entries
                WHERE user_id = ? AND (created_at, id) < (?, ?)
                ORDER BY created_at DESC, id DESC
                LIMIT ?
                "#,
            )
            .bind(&authed.id)
            .bind(&c.created_at)
            .bind(&c.id)
            .bind(limit as i64 + 1)
            .fetch_all(&state.db)
            .await
        }
        None => {
            sqlx::query_as::<_, Entry>(
                r#"
                SELECT * FROM entries
                WHERE user_id = ?
                ORDER BY created_at DESC, id DESC
                LIMIT ?
                "#,
            )
            .bind(&authed.id)
            .bind(limit as i64 + 1)
            .fetch_all(&state.db)
            .await
        }
    }
    .map_err(|e| {
        error!(error = %e, user_id = %authed.id, "Database error listing entries");
        ApiError::DatabaseError(e)
    })?;

    let next_cursor = if entries.len() > limit as usize {
        entries.truncate(limit as usize);
        entries.last().map(|last| {
            EntryCursor {
                created_at: last.created_at.clone().unwrap_or_default(),
                id: last.id.clone(),
            }
            .encode()
        })
    } else {
        None
    };

    Ok(Json(EntryPage {
        entries,
        next_cursor,
    }))
}

/// POST /api/diary - Create a new entry for the authenticated user
pub async fn create_entry(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<CreateEntryRequest>,
) -> Result<(StatusCode, Json<Entry>), ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = EntryValidator.validate(&request);
    if !validation_result.is_valid {
        warn!(
            user_id = %authed.id,
            errors = ?validation_result.errors,
            "Entry creation validation failed"
        );
        return Err(ApiError::from(validation_result));
    }

    let entry_id = generate_entry_id();

    sqlx::query(
        r#"
        INSERT INTO entries (id, user_id, title, content, created_at, updated_at)
        VALUES (?, ?, ?, ?, datetime('now'), datetime('now'))
        "#,
    )
    .bind(&entry_id)
    .bind(&authed.id)
    .bind(&request.title)
    .bind(&request.content)
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(
            error = %e,
            user_id = %authed.id,
            entry_id = %entry_id,
            "Database error creating entry"
        );
        ApiError::DatabaseError(e)
    })?;

    let entry = sqlx::query_as::<_, Entry>("SELECT * FROM entries WHERE id = ?")
        .bind(&entry_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.id, entry_id = %entry_id, "Diary entry created");

    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/diary/:id - Read one entry
///
/// A foreign entry answers 404, same as a missing one: a read must not
/// confirm that somebody else's entry id exists.
pub async fn get_entry(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(entry_id): Path<String>,
) -> Result<Json<Entry>, ApiError> {
    let state = state_lock.read().await.clone();

    let entry = fetch_entry(&state, &entry_id).await?;

    let entry = match entry {
        Some(e) => e,
        None => return Err(ApiError::NotFound("entry not found".to_string())),
    };

    if entry.user_id != authed.id {
        warn!(
            user_id = %authed.id,
            entry_id = %entry_id,
            "Read of foreign entry denied"
        );
        return Err(ApiError::NotFound("entry not found".to_string()));
    }

    Ok(Json(entry))
}

/// PUT /api/diary/:id - Update an entry's title and/or content
///
/// A foreign entry answers 403 here, distinguishable from 404.
pub async fn update_entry(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(entry_id): Path<String>,
    Json(request): Json<UpdateEntryRequest>,
) -> Result<Json<Entry>, ApiError> {
    let state = state_lock.read().await.clone();

    let entry = match fetch_entry(&state, &entry_id).await? {
        Some(e) => e,
        None => return Err(ApiError::NotFound("entry not found".to_string())),
    };

    if entry.user_id != authed.id {
        warn!(
            user_id = %authed.id,
            entry_id = %entry_id,
            "Update of foreign entry denied"
        );
        return Err(ApiError::Forbidden("not your entry".to_string()));
    }

    let validation_result = EntryValidator.validate(&request);
    if !validation_result.is_valid {
        return Err(ApiError::from(validation_result));
    }

    sqlx::query(
        r#"
        UPDATE entries
        SET title = COALESCE(?, title),
            content = COALESCE(?, content),
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(request.title.as_deref())
    .bind(request.content.as_deref())
    .bind(&entry_id)
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, entry_id = %entry_id, "Database error updating entry");
        ApiError::DatabaseError(e)
    })?;

    let entry = sqlx::query_as::<_, Entry>("SELECT * FROM entries WHERE id = ?")
        .bind(&entry_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.id, entry_id = %entry_id, "Diary entry updated");

    Ok(Json(entry))
}

/// DELETE /api/diary/:id - Delete an entry
pub async fn delete_entry(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(entry_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let entry = match fetch_entry(&state, &entry_id).await? {
        Some(e) => e,
        None => return Err(ApiError::NotFound("entry not found".to_string())),
    };

    if entry.user_id != authed.id {
        warn!(
            user_id = %authed.id,
            entry_id = %entry_id,
            "Delete of foreign entry denied"
        );
        return Err(ApiError::Forbidden("not your entry".to_string()));
    }

    sqlx::query("DELETE FROM entries WHERE id = ?")
        .bind(&entry_id)
        .execute(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, entry_id = %entry_id, "Database error deleting entry");
            ApiError::DatabaseError(e)
        })?;

    info!(user_id = %authed.id, entry_id = %entry_id, "Diary entry deleted");

    Ok(Json(serde_json::json!({ "message": "Entry deleted" })))
}

// ---- Helper Functions ----

/// Fetch an entry by primary key only; ownership is the caller's decision
async fn fetch_entry(state: &AppState, entry_id: &str) -> Result<Option<Entry>, ApiError> {
    sqlx::query_as::<_, Entry>("SELECT * FROM entries WHERE id = ?")
        .bind(entry_id)
        .fetch_optional(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, entry_id = %entry_id, "Database error fetching entry");
            ApiError::DatabaseError(e)
        })
}
