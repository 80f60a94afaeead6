//! Push messaging provider port
//!
//! 推送服务端口。
//!
//! The contract for the platform push provider: permission prompt, device
//! token, and the three delivery streams. Subscriptions return plain
//! `mpsc` receivers; dropping the receiver is how a consumer detaches.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::push::{PermissionStatus, PushMessage};

#[async_trait]
pub trait PushMessagingPort: Send + Sync {
    /// Prompt for notification permission through the provider.
    async fn request_permission(&self) -> Result<PermissionStatus, PushError>;

    /// Current device push token. Fails when the provider has not issued
    /// one yet.
    async fn token(&self) -> Result<String, PushError>;

    /// Token rotations. Each value replaces the previous token entirely.
    async fn subscribe_token_refresh(&self) -> Result<mpsc::Receiver<String>, PushError>;

    /// Messages delivered while the app is in the foreground.
    async fn subscribe_foreground_messages(&self)
        -> Result<mpsc::Receiver<PushMessage>, PushError>;

    /// Messages whose system notification the user tapped while the app
    /// was backgrounded.
    async fn subscribe_opened_notifications(
        &self,
    ) -> Result<mpsc::Receiver<PushMessage>, PushError>;

    /// The notification that launched the app from a dead state, if any.
    /// Consuming it clears it; a second call returns `None`.
    async fn take_initial_message(&self) -> Result<Option<PushMessage>, PushError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PushError {
    #[error("push provider unavailable: {0}")]
    Unavailable(String),

    #[error("permission request failed: {0}")]
    PermissionRequestFailed(String),

    #[error("no push token issued")]
    TokenMissing,
}
