//! Local notification renderer port
//!
//! Channel declaration and immediate display of notifications while the
//! app is foregrounded. The OS tray handles everything else.

use async_trait::async_trait;

use crate::notification::{LocalNotification, NotificationChannelSpec};

#[async_trait]
pub trait NotificationRendererPort: Send + Sync {
    /// Declare a channel. Idempotent: declaring an existing channel keeps
    /// its user-edited settings.
    async fn create_channel(&self, spec: &NotificationChannelSpec) -> anyhow::Result<()>;

    /// Display a notification right now, on the given channel.
    async fn display(&self, notification: &LocalNotification) -> anyhow::Result<()>;
}
