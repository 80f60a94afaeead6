//! Committed session state.
//!
//! 已提交的会话状态。

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use hn_core::{AppBootstrapResult, PermissionStatus};

/// The session state every interested party observes.
///
/// Tri-state by construction: the channel holds `None` until the first
/// bootstrap commits, then always the latest committed result. Writes go
/// through [`SessionStateHandle::commit`], which is crate-private; the
/// shells and workers only ever get receivers.
#[derive(Clone)]
pub struct SessionStateHandle {
    tx: Arc<watch::Sender<Option<AppBootstrapResult>>>,
}

impl SessionStateHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// A fresh receiver. The current value is observable immediately.
    pub fn subscribe(&self) -> watch::Receiver<Option<AppBootstrapResult>> {
        self.tx.subscribe()
    }

    /// The latest committed result, or `None` while unresolved.
    pub fn current(&self) -> Option<AppBootstrapResult> {
        self.tx.borrow().clone()
    }

    pub(crate) fn commit(&self, result: AppBootstrapResult) {
        info!(
            logged_in = result.logged_in,
            has_completed_onboarding = result.has_completed_onboarding,
            permission = ?result.notification_permission,
            "committing session state"
        );
        self.tx.send_replace(Some(result));
    }

    /// Wait until some result has been committed and return it.
    pub async fn resolved(&self) -> AppBootstrapResult {
        let mut rx = self.subscribe();
        let result = match rx.wait_for(|state| state.is_some()).await {
            Ok(state) => state
                .clone()
                .unwrap_or_else(|| AppBootstrapResult::logged_out(false, PermissionStatus::Denied)),
            // Unreachable while this handle holds the sender alive.
            Err(_) => AppBootstrapResult::logged_out(false, PermissionStatus::Denied),
        };
        result
    }
}

impl Default for SessionStateHandle {
    fn default() -> Self {
        Self::new()
    }
}
