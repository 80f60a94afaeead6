//! Session credential store.
//!
//! 会话凭证存取。

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use hn_core::ports::{AccessTokenProviderPort, ClockPort, KeyValueStoreError, KeyValueStorePort};
use hn_core::storage::keys;
use hn_core::StoredSession;

/// Owns the session keys in the durable key-value namespace.
///
/// Every mutation is awaited through to the backing store before it
/// returns, so a caller that has seen `save` or `clear` resolve can rely
/// on what is on disk. Validity lives in [`StoredSession::is_valid_at`];
/// this type only moves bytes.
pub struct CredentialStore {
    store: Arc<dyn KeyValueStorePort>,
    clock: Arc<dyn ClockPort>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStorePort>, clock: Arc<dyn ClockPort>) -> Self {
        Self { store, clock }
    }

    /// Persist a fresh session. The backend hands out a relative lifetime;
    /// the absolute expiry is pinned here, at the moment of saving.
    ///
    /// The token is written before the expiry: if the second write fails,
    /// what remains on disk is a token without an expiry, which reads back
    /// as invalid rather than as a session that never expires.
    pub async fn save(&self, token: &str, expires_in_secs: i64) -> Result<(), KeyValueStoreError> {
        let expires_at_ms = self.clock.now_ms() + expires_in_secs * 1000;
        self.store.set(keys::ACCESS_TOKEN, token).await?;
        self.store
            .set(keys::TOKEN_EXPIRY, &expires_at_ms.to_string())
            .await
    }

    /// Destroy the persisted session. Removing an absent session is fine.
    pub async fn clear(&self) -> Result<(), KeyValueStoreError> {
        self.store.remove(keys::ACCESS_TOKEN).await?;
        self.store.remove(keys::TOKEN_EXPIRY).await
    }

    /// The raw token, without any validity judgement.
    pub async fn token(&self) -> Result<Option<String>, KeyValueStoreError> {
        self.store.get(keys::ACCESS_TOKEN).await
    }

    /// Read back whatever session is on disk.
    ///
    /// An expiry that does not parse as epoch milliseconds is treated as
    /// missing, which makes the session invalid downstream.
    pub async fn stored_session(&self) -> Result<Option<StoredSession>, KeyValueStoreError> {
        let token = match self.store.get(keys::ACCESS_TOKEN).await? {
            Some(token) => token,
            None => return Ok(None),
        };
        let expires_at_ms = match self.store.get(keys::TOKEN_EXPIRY).await? {
            Some(raw) => match raw.parse::<i64>() {
                Ok(ms) => Some(ms),
                Err(_) => {
                    warn!(raw, "stored token expiry is not a timestamp, treating as missing");
                    None
                }
            },
            None => None,
        };
        Ok(Some(StoredSession {
            token,
            expires_at_ms,
        }))
    }

    /// Whether a session exists and its expiry is strictly in the future.
    pub async fn is_valid(&self) -> Result<bool, KeyValueStoreError> {
        let now_ms = self.clock.now_ms();
        Ok(self
            .stored_session()
            .await?
            .map(|session| session.is_valid_at(now_ms))
            .unwrap_or(false))
    }
}

#[async_trait]
impl AccessTokenProviderPort for CredentialStore {
    /// Storage failures degrade to "no token": the request goes out
    /// unauthenticated and the backend's 401 drives the usual recovery.
    async fn access_token(&self) -> Option<String> {
        match self.token().await {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "could not read access token, sending request unauthenticated");
                None
            }
        }
    }
}
