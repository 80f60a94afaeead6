use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use hn_core::ports::KeyValueStorePort;
use hn_core::storage::{flag_is_set, keys, FLAG_TRUE};

use crate::session::SessionStateHandle;

/// Use case for completing onboarding.
///
/// Persists the onboarding flag once the intro carousel has been
/// dismissed. The flag is written at most once and survives logout, so a
/// returning customer never sees the carousel again.
pub struct CompleteOnboarding {
    store: Arc<dyn KeyValueStorePort>,
    state: SessionStateHandle,
}

impl CompleteOnboarding {
    /// Create a new CompleteOnboarding use case from trait objects.
    pub fn new(store: Arc<dyn KeyValueStorePort>, state: SessionStateHandle) -> Self {
        Self { store, state }
    }

    /// Mark onboarding as complete.
    pub async fn execute(&self) -> anyhow::Result<()> {
        let span = info_span!("usecase.complete_onboarding.execute");

        async {
            let current = self.store.get(keys::ONBOARDING_COMPLETED).await?;
            if flag_is_set(current.as_deref()) {
                return Ok(());
            }
            self.store.set(keys::ONBOARDING_COMPLETED, FLAG_TRUE).await?;
            info!("onboarding marked complete");

            // Keep the committed state in step when one exists already.
            if let Some(mut committed) = self.state.current() {
                if !committed.has_completed_onboarding {
                    committed.has_completed_onboarding = true;
                    self.state.commit(committed);
                }
            }
            Ok(())
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use hn_core::ports::KeyValueStoreError;
    use hn_core::{AppBootstrapResult, PermissionStatus};

    use super::*;

    struct CountingStore {
        values: std::sync::Mutex<BTreeMap<String, String>>,
        writes: AtomicUsize,
    }

    impl CountingStore {
        fn new() -> Self {
            Self {
                values: std::sync::Mutex::new(BTreeMap::new()),
                writes: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl KeyValueStorePort for CountingStore {
        async fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
            self.values.lock().unwrap().remove(key);
            Ok(())
        }

        async fn clear(&self) -> Result<(), KeyValueStoreError> {
            self.values.lock().unwrap().clear();
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_execute_sets_the_flag_once() {
        let store = Arc::new(CountingStore::new());
        let use_case = CompleteOnboarding::new(store.clone(), SessionStateHandle::new());

        use_case.execute().await.unwrap();
        use_case.execute().await.unwrap();

        assert_eq!(
            store.values.lock().unwrap().get("onboarding_completed").map(String::as_str),
            Some("true")
        );
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_execute_updates_committed_state() {
        let store = Arc::new(CountingStore::new());
        let state = SessionStateHandle::new();
        state.commit(AppBootstrapResult::logged_out(false, PermissionStatus::Denied));
        let use_case = CompleteOnboarding::new(store, state.clone());

        use_case.execute().await.unwrap();

        assert!(state.current().unwrap().has_completed_onboarding);
    }

    #[tokio::test]
    async fn test_execute_without_committed_state_only_persists() {
        let store = Arc::new(CountingStore::new());
        let state = SessionStateHandle::new();
        let use_case = CompleteOnboarding::new(store, state.clone());

        use_case.execute().await.unwrap();

        assert_eq!(state.current(), None);
    }
}
