//! Replace the inbox with the backend's canonical list.

use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use hn_core::ports::{ApiClientPort, ApiError};

use super::SharedInbox;

/// Pulls the canonical notification list and swaps it in wholesale.
///
/// The server wins: local-only records disappear and read state comes
/// from the canonical records. Used when the notifications screen opens,
/// so badge counts survive reinstalls and multi-device use.
pub struct ReconcileInbox {
    inbox: SharedInbox,
    api: Arc<dyn ApiClientPort>,
}

impl ReconcileInbox {
    pub fn new(inbox: SharedInbox, api: Arc<dyn ApiClientPort>) -> Self {
        Self { inbox, api }
    }

    /// Returns how many records the canonical list holds. A fetch failure
    /// leaves the local inbox exactly as it was.
    pub async fn execute(&self) -> Result<usize, ApiError> {
        let span = info_span!("usecase.reconcile_inbox.execute");
        async {
            let canonical = self.api.fetch_notifications().await?;
            let count = canonical.len();
            self.inbox.write().await.reconcile(canonical);
            info!(count, "inbox reconciled with the backend");
            Ok(count)
        }
        .instrument(span)
        .await
    }
}
