//! Log-backed notification renderer.
//!
//! Stands in for the OS notification tray where there is none: every
//! channel declaration and display goes to the log, and displays are kept
//! in memory so tests and previews can look at what would have been shown.

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::info;

use hn_core::notification::{LocalNotification, NotificationChannelSpec};
use hn_core::ports::NotificationRendererPort;

#[derive(Default)]
pub struct TracingNotificationRenderer {
    displayed: Mutex<Vec<LocalNotification>>,
}

impl TracingNotificationRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything displayed so far, oldest first.
    pub fn displayed(&self) -> Vec<LocalNotification> {
        self.displayed.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationRendererPort for TracingNotificationRenderer {
    async fn create_channel(&self, spec: &NotificationChannelSpec) -> anyhow::Result<()> {
        info!(
            channel_id = %spec.id,
            importance = ?spec.importance,
            "notification channel declared"
        );
        Ok(())
    }

    async fn display(&self, notification: &LocalNotification) -> anyhow::Result<()> {
        info!(
            channel_id = %notification.channel_id,
            title = %notification.title,
            "notification displayed"
        );
        self.displayed.lock().unwrap().push(notification.clone());
        Ok(())
    }
}
