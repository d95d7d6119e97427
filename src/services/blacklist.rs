//! In-memory token revocation list.
//!
//! Logout places tokens here; every verification consults it. The list lives
//! for the process lifetime only. Each entry remembers when its token expires
//! so entries can be dropped once expiry alone is enough to reject the token.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::Utc;
use sha2::{Digest, Sha256};

use crate::services::token::EXPIRY_LEEWAY_SECS;

/// Revoked tokens keyed by SHA-256 digest, mapped to their `exp` timestamp.
#[derive(Debug, Default)]
pub struct TokenBlacklist {
    entries: RwLock<HashMap<String, i64>>,
}

fn digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// True while a token expiring at `exp` could still pass verification at `now`.
fn still_verifiable(exp: i64, now: i64) -> bool {
    exp + EXPIRY_LEEWAY_SECS >= now
}

impl TokenBlacklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revokes `token`, which would otherwise stay valid until `expires_at`
    /// (Unix seconds). Expired entries are purged on the way.
    pub fn revoke(&self, token: &str, expires_at: i64) {
        let now = Utc::now().timestamp();
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.retain(|_, exp| still_verifiable(*exp, now));
        entries.insert(digest(token), expires_at);
    }

    pub fn is_revoked(&self, token: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(&digest(token))
    }

    /// Drops entries whose token can no longer verify at `now`.
    /// Returns how many were removed.
    pub fn purge_expired_at(&self, now: i64) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|_, exp| still_verifiable(*exp, now));
        before - entries.len()
    }

    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now().timestamp())
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Periodically purges expired entries. Runs until the runtime shuts down.
pub async fn run_sweeper(blacklist: Arc<TokenBlacklist>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        let removed = blacklist.purge_expired();
        if removed > 0 {
            tracing::debug!(
                removed,
                remaining = blacklist.len(),
                "Purged expired tokens from blacklist"
            );
        }
    }
}
