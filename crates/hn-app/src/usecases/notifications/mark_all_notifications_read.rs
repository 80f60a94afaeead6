//! Mark the whole inbox read.

use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument};

use hn_core::ids::NotificationId;
use hn_core::ports::ApiClientPort;

use super::SharedInbox;

/// Marks every unread record read, locally first, then record by record
/// on the backend. Backend failures are logged and skipped; the records
/// are independent, so one dead call does not stop the rest.
pub struct MarkAllNotificationsRead {
    inbox: SharedInbox,
    api: Arc<dyn ApiClientPort>,
}

impl MarkAllNotificationsRead {
    pub fn new(inbox: SharedInbox, api: Arc<dyn ApiClientPort>) -> Self {
        Self { inbox, api }
    }

    /// Returns how many records changed.
    pub async fn execute(&self) -> usize {
        let span = info_span!("usecase.mark_all_notifications_read.execute");
        async {
            let unread: Vec<NotificationId> = {
                let mut inbox = self.inbox.write().await;
                let unread = inbox
                    .records()
                    .iter()
                    .filter(|record| !record.read)
                    .map(|record| record.id.clone())
                    .collect();
                inbox.mark_all_read();
                unread
            };

            for id in &unread {
                if let Err(err) = self.api.mark_notification_read(id.as_str()).await {
                    warn!(id = %id, error = %err, "backend missed a read mark");
                }
            }
            if !unread.is_empty() {
                info!(count = unread.len(), "inbox marked read");
            }
            unread.len()
        }
        .instrument(span)
        .await
    }
}
