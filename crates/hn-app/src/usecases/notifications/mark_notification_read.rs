//! Mark a single notification read.

use std::sync::Arc;

use tracing::{info_span, warn, Instrument};

use hn_core::ids::NotificationId;
use hn_core::ports::ApiClientPort;

use super::SharedInbox;

/// Marks a record read locally and mirrors the change to the backend.
///
/// The inbox is the source of truth for the running session. The backend
/// call is best effort: a failure does not undo the local mark, and the
/// next reconcile squares the two up.
pub struct MarkNotificationRead {
    inbox: SharedInbox,
    api: Arc<dyn ApiClientPort>,
}

impl MarkNotificationRead {
    pub fn new(inbox: SharedInbox, api: Arc<dyn ApiClientPort>) -> Self {
        Self { inbox, api }
    }

    /// Returns `true` when a record with this id exists in the inbox.
    pub async fn execute(&self, id: &NotificationId) -> bool {
        let span = info_span!("usecase.mark_notification_read.execute", id = %id);
        async {
            let known = self.inbox.write().await.mark_read(id);
            if !known {
                warn!("no such notification in the inbox");
                return false;
            }
            if let Err(err) = self.api.mark_notification_read(id.as_str()).await {
                warn!(error = %err, "backend missed the read mark, reconcile will catch it up");
            }
            true
        }
        .instrument(span)
        .await
    }
}
