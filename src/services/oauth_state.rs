// src/services/oauth_state.rs
//! Issued OAuth state tracking
//!
//! The `state` parameter embedded in the Google authorization URL only
//! proves CSRF safety if the callback can show it was actually issued by
//! us and has not been used before. States live here between the redirect
//! to Google and the callback, for at most STATE_TTL.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// How long an issued state stays redeemable
const STATE_TTL_MINUTES: i64 = 10;

/// In-process store of issued, not-yet-consumed OAuth states
pub struct OAuthStateStore {
    states: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl OAuthStateStore {
    pub fn new() -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
        }
    }

    /// Record a freshly issued state
    pub async fn issue(&self, state: String) {
        let mut states = self.states.write().await;

        // Opportunistic purge keeps abandoned flows from accumulating
        let cutoff = Utc::now() - Duration::minutes(STATE_TTL_MINUTES);
        states.retain(|_, issued_at| *issued_at > cutoff);

        states.insert(state, Utc::now());
    }

    /// Redeem a state returned by the OAuth callback
    ///
    /// Removes it, so a second presentation fails. Returns false for an
    /// unknown, reused, or expired state.
    pub async fn consume(&self, state: &str) -> bool {
        let mut states = self.states.write().await;

        match states.remove(state) {
            Some(issued_at) => {
                let age = Utc::now() - issued_at;
                let valid = age < Duration::minutes(STATE_TTL_MINUTES);
                if !valid {
                    debug!("OAuth state expired before callback");
                }
                valid
            }
            None => false,
        }
    }
}

impl Default for OAuthStateStore {
    fn default() -> Self {
        Self::new()
    }
}
