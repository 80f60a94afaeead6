//! Read the current inbox.

use hn_core::NotificationRecord;

use super::SharedInbox;

/// Snapshot of the inbox for the notifications screen.
pub struct ListNotifications {
    inbox: SharedInbox,
}

impl ListNotifications {
    pub fn new(inbox: SharedInbox) -> Self {
        Self { inbox }
    }

    /// All records, newest first.
    pub async fn execute(&self) -> Vec<NotificationRecord> {
        self.inbox.read().await.records().to_vec()
    }

    /// How many records are unread. Drives the badge.
    pub async fn unread_count(&self) -> usize {
        self.inbox.read().await.unread_count()
    }
}
