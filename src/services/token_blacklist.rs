//! In-memory revocation list for logged-out JWTs.
//!
//! Entries live until the token's own `exp`, after which the token would be
//! rejected by signature validation anyway.

use chrono::Utc;
use dashmap::DashMap;
use log::{debug, info};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Seconds between sweeps of expired entries.
const SWEEP_INTERVAL_SECS: i64 = 300;

/// Shared revocation list keyed by a hash of the raw token.
#[derive(Clone)]
pub struct TokenBlacklist {
    /// token hash -> expiry (unix seconds)
    tokens: Arc<DashMap<u64, i64>>,
    last_sweep: Arc<Mutex<i64>>,
}

impl TokenBlacklist {
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(DashMap::new()),
            last_sweep: Arc::new(Mutex::new(Utc::now().timestamp())),
        }
    }

    /// Revoke `token` until its `exp` claim. Already expired tokens are ignored.
    pub async fn revoke(&self, token: &str, exp: usize) {
        let now = Utc::now().timestamp();
        let exp = exp as i64;
        if exp > now {
            self.tokens.insert(Self::fingerprint(token), exp);
            debug!("Token revoked for {}s", exp - now);
        }
        self.maybe_sweep(now).await;
    }

    pub fn is_revoked(&self, token: &str) -> bool {
        let key = Self::fingerprint(token);
        let now = Utc::now().timestamp();
        match self.tokens.get(&key).map(|entry| *entry) {
            Some(exp) if exp > now => true,
            Some(_) => {
                self.tokens.remove(&key);
                false
            }
            None => false,
        }
    }

    fn fingerprint(token: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        hasher.finish()
    }

    async fn maybe_sweep(&self, now: i64) {
        let mut last = self.last_sweep.lock().await;
        if now - *last < SWEEP_INTERVAL_SECS {
            return;
        }
        let before = self.tokens.len();
        self.tokens.retain(|_, exp| *exp > now);
        let removed = before - self.tokens.len();
        if removed > 0 {
            info!("Token blacklist sweep removed {} expired entries", removed);
        }
        *last = now;
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Default for TokenBlacklist {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_revoked_token_is_rejected_until_expiry() {
        let blacklist = TokenBlacklist::new();
        let exp = (Utc::now().timestamp() + 3600) as usize;
        blacklist.revoke("token-a", exp).await;
        assert!(blacklist.is_revoked("token-a"));
        assert!(!blacklist.is_revoked("token-b"));
        assert_eq!(blacklist.len(), 1);
    }

    #[tokio::test]
    async fn test_expired_token_is_not_stored() {
        let blacklist = TokenBlacklist::new();
        let exp = (Utc::now().timestamp() - 10) as usize;
        blacklist.revoke("stale", exp).await;
        assert!(blacklist.is_empty());
        assert!(!blacklist.is_revoked("stale"));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let blacklist = TokenBlacklist::new();
        let clone = blacklist.clone();
        clone
            .revoke("shared", (Utc::now().timestamp() + 60) as usize)
            .await;
        assert!(blacklist.is_revoked("shared"));
    }
}
