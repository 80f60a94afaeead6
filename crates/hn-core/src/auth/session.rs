use serde::{Deserialize, Serialize};

/// A session token as read back from durable storage.
///
/// 从持久化存储读回的会话令牌。
///
/// Validity is decided here and nowhere else: the token must exist *and*
/// carry an expiry strictly in the future. A token persisted without an
/// expiry is never valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    /// Bearer token issued by the backend at login.
    pub token: String,
    /// Absolute expiry in epoch milliseconds. `None` when the expiry key
    /// was missing or unparseable.
    pub expires_at_ms: Option<i64>,
}

impl StoredSession {
    pub fn new(token: impl Into<String>, expires_at_ms: i64) -> Self {
        Self {
            token: token.into(),
            expires_at_ms: Some(expires_at_ms),
        }
    }

    /// A token whose expiry never made it to disk. Treated as invalid.
    pub fn without_expiry(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires_at_ms: None,
        }
    }

    /// Strict comparison: a token expiring exactly at `now_ms` is already
    /// invalid.
    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        match self.expires_at_ms {
            Some(expiry) => expiry > now_ms,
            None => false,
        }
    }
}
