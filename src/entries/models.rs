// src/entries/models.rs

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Diary entry database model
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Entry {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// POST /api/diary request body
#[derive(Deserialize, Debug)]
pub struct CreateEntryRequest {
    pub title: String,
    pub content: String,
}

/// PUT /api/diary/:id request body
#[derive(Deserialize, Debug)]
pub struct UpdateEntryRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// GET /api/diary query parameters
#[derive(Deserialize, Debug)]
pub struct ListEntriesQuery {
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

/// One page of entries, newest first
#[derive(Serialize, Debug)]
pub struct EntryPage {
    pub entries: Vec<Entry>,
    pub next_cursor: Option<String>,
}

/// Opaque pagination cursor over (created_at, id)
///
/// created_at alone is not a total order: two entries written in the same
/// second tie, so the id breaks the tie.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryCursor {
    pub created_at: String,
    pub id: String,
}

impl EntryCursor {
    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(format!("{}|{}", self.created_at, self.id))
    }

    /// None for anything that is not a cursor we produced
    pub fn decode(raw: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(raw).ok()?;
        let decoded = String::from_utf8(bytes).ok()?;
        let (created_at, id) = decoded.split_once('|')?;
        if created_at.is_empty() || id.is_empty() {
            return None;
        }
        Some(Self {
            created_at: created_at.to_string(),
            id: id.to_string(),
        })
    }
}
