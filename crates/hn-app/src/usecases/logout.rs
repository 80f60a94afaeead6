//! Log out and tear the session down.
//!
//! 退出登录并清理会话。

use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument};

use hn_core::ports::KeyValueStorePort;
use hn_core::storage::{flag_is_set, keys};
use hn_core::{AppBootstrapResult, PermissionStatus};

use crate::session::{CredentialStore, SessionStateHandle};
use crate::usecases::notifications::NotificationSynchronizer;

/// Ends the session: notification work stops, the stored credentials are
/// destroyed, the inbox is emptied, and a logged-out state is committed.
///
/// The onboarding flag survives logout. Only the session dies.
pub struct Logout {
    credentials: Arc<CredentialStore>,
    store: Arc<dyn KeyValueStorePort>,
    synchronizer: Arc<NotificationSynchronizer>,
    state: SessionStateHandle,
}

impl Logout {
    pub fn new(
        credentials: Arc<CredentialStore>,
        store: Arc<dyn KeyValueStorePort>,
        synchronizer: Arc<NotificationSynchronizer>,
        state: SessionStateHandle,
    ) -> Self {
        Self {
            credentials,
            store,
            synchronizer,
            state,
        }
    }

    /// The synchronizer stops before the wipe so no push event lands in a
    /// dying session. A failed credential wipe aborts the logout with the
    /// committed state unchanged; retrying is cheap because everything up
    /// to the wipe is idempotent.
    pub async fn execute(&self) -> anyhow::Result<()> {
        let span = info_span!("usecase.logout.execute");
        async {
            self.synchronizer.stop().await;
            self.credentials.clear().await?;
            self.synchronizer.inbox().write().await.clear();

            let has_completed_onboarding = match self.store.get(keys::ONBOARDING_COMPLETED).await {
                Ok(value) => flag_is_set(value.as_deref()),
                Err(err) => {
                    warn!(error = %err, "onboarding flag unreadable, keeping the committed value");
                    self.state
                        .current()
                        .map(|state| state.has_completed_onboarding)
                        .unwrap_or(false)
                }
            };
            let permission = self
                .state
                .current()
                .map(|state| state.notification_permission)
                .unwrap_or(PermissionStatus::Denied);

            self.state.commit(AppBootstrapResult::logged_out(
                has_completed_onboarding,
                permission,
            ));
            info!("logged out");
            Ok(())
        }
        .instrument(span)
        .await
    }
}
