//! Push token provider.
//!
//! 推送令牌获取与缓存。

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use hn_core::ports::{KeyValueStorePort, OsFamily, PlatformPort, PushError, PushMessagingPort};
use hn_core::push::ANDROID_RUNTIME_PERMISSION_MIN_API;
use hn_core::storage::keys;
use hn_core::{PermissionStatus, PushToken};

/// Obtains notification permission and the device push token, degrading
/// instead of failing.
///
/// Permission denial and token absence are ordinary outcomes here: the
/// caller always gets an answer, and the worst answer is `Denied` or
/// `None`. The last known token is cached in durable storage so a slow
/// or briefly unavailable provider does not read as "no token".
pub struct PushTokenProvider {
    messaging: Arc<dyn PushMessagingPort>,
    platform: Arc<dyn PlatformPort>,
    store: Arc<dyn KeyValueStorePort>,
}

impl PushTokenProvider {
    pub fn new(
        messaging: Arc<dyn PushMessagingPort>,
        platform: Arc<dyn PlatformPort>,
        store: Arc<dyn KeyValueStorePort>,
    ) -> Self {
        Self {
            messaging,
            platform,
            store,
        }
    }

    /// Ask for notification permission the way the host OS wants it asked.
    ///
    /// Android 13+ gets the OS `POST_NOTIFICATIONS` prompt, older Android
    /// has the permission from install time, everything else goes through
    /// the provider prompt. Any error reads as denied.
    pub async fn request_permission(&self) -> PermissionStatus {
        let os = self.platform.os();
        let outcome = match os.family {
            OsFamily::Android if os.major_version >= ANDROID_RUNTIME_PERMISSION_MIN_API => {
                self.platform
                    .request_post_notifications()
                    .await
                    .map_err(|err| PushError::PermissionRequestFailed(err.to_string()))
            }
            OsFamily::Android => Ok(PermissionStatus::Authorized),
            _ => self.messaging.request_permission().await,
        };
        match outcome {
            Ok(status) => status,
            Err(err) => {
                warn!(error = %err, "permission request failed, treating as denied");
                PermissionStatus::Denied
            }
        }
    }

    /// The device push token: the cached value when one exists, a fresh
    /// request otherwise.
    ///
    /// Rotations arrive through the refresh stream while the process is
    /// alive, so a cached value is current enough to serve without a
    /// round trip. Returns `None` only when the cache is empty *and* the
    /// provider fails; a cache write failure costs nothing but the cache.
    pub async fn token(&self) -> Option<PushToken> {
        if let Some(cached) = self.cached_token().await {
            return Some(cached);
        }
        match self.messaging.token().await {
            Ok(value) => {
                if let Err(err) = self.store.set(keys::PUSH_TOKEN_CACHE, &value).await {
                    warn!(error = %err, "could not cache push token");
                }
                Some(PushToken::unregistered(value))
            }
            Err(err) => {
                warn!(error = %err, "push provider gave no token");
                None
            }
        }
    }

    /// Overwrite the cached token value. Used on rotation.
    pub async fn cache_token(&self, value: &str) {
        if let Err(err) = self.store.set(keys::PUSH_TOKEN_CACHE, value).await {
            warn!(error = %err, "could not cache rotated push token");
        } else {
            debug!("cached rotated push token");
        }
    }

    /// Token rotation stream, handed through from the provider.
    pub async fn subscribe_token_refresh(&self) -> Result<mpsc::Receiver<String>, PushError> {
        self.messaging.subscribe_token_refresh().await
    }

    /// The last token value this device obtained, if any survives in the
    /// cache. Rotation handling seeds its duplicate check from this.
    pub async fn cached_token(&self) -> Option<PushToken> {
        match self.store.get(keys::PUSH_TOKEN_CACHE).await {
            Ok(Some(value)) => Some(PushToken::unregistered(value)),
            Ok(None) => None,
            Err(err) => {
                warn!(error = %err, "push token cache unreadable");
                None
            }
        }
    }
}
