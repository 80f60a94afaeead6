//! Use case for resolving the session at cold start
//! 冷启动时解析会话状态的用例

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error, info, info_span, warn, Instrument};

use hn_core::bootstrap::{BootstrapAction, BootstrapEvent, BootstrapMachine, BootstrapState};
use hn_core::ports::{
    ApiClientPort, ClockPort, KeyValueStorePort, NotificationRendererPort, PushTokenRegistration,
};
use hn_core::notification::NotificationChannelSpec;
use hn_core::storage::{flag_is_set, keys};
use hn_core::{AppBootstrapResult, BootstrapFailure, PermissionStatus};

use crate::push::PushTokenProvider;
use crate::session::{CredentialStore, SessionStateHandle};

/// Drives the bootstrap state machine once per cold start.
///
/// ## Behavior / 行为
/// - Declares notification channels, gathers permission and push token,
///   then feeds the pure state machine and executes its actions.
/// - Never fails: every port error degrades to a committed result.
/// - Single-flight: a second `execute` while one is running joins the
///   in-flight run and returns its result.
pub struct BootstrapApp {
    credentials: Arc<CredentialStore>,
    provider: Arc<PushTokenProvider>,
    api: Arc<dyn ApiClientPort>,
    store: Arc<dyn KeyValueStorePort>,
    renderer: Arc<dyn NotificationRendererPort>,
    clock: Arc<dyn ClockPort>,
    state: SessionStateHandle,
    channels: Vec<NotificationChannelSpec>,
    in_flight: Mutex<()>,
}

impl BootstrapApp {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        credentials: Arc<CredentialStore>,
        provider: Arc<PushTokenProvider>,
        api: Arc<dyn ApiClientPort>,
        store: Arc<dyn KeyValueStorePort>,
        renderer: Arc<dyn NotificationRendererPort>,
        clock: Arc<dyn ClockPort>,
        state: SessionStateHandle,
        channels: Vec<NotificationChannelSpec>,
    ) -> Self {
        Self {
            credentials,
            provider,
            api,
            store,
            renderer,
            clock,
            state,
            channels,
            in_flight: Mutex::new(()),
        }
    }

    /// Resolve the session and commit the result.
    ///
    /// # Returns / 返回值
    /// The committed [`AppBootstrapResult`]. This method has no error
    /// case; failures are folded into the result itself.
    pub async fn execute(&self) -> AppBootstrapResult {
        let span = info_span!("usecase.bootstrap_app.execute");

        async {
            match self.in_flight.try_lock() {
                Ok(_guard) => self.run().await,
                Err(_) => {
                    debug!("bootstrap already in flight, joining its result");
                    self.state.resolved().await
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(&self) -> AppBootstrapResult {
        self.declare_channels().await;

        let permission = self.provider.request_permission().await;
        if permission == PermissionStatus::Denied {
            info!(
                failure = %BootstrapFailure::PermissionDenied,
                "continuing without alerts"
            );
        }
        let push_token = self.provider.token().await;
        if push_token.is_none() {
            info!(
                failure = %BootstrapFailure::TokenUnavailable("provider and cache both empty".into()),
                "push delivery disabled for this run"
            );
        }

        let mut state = BootstrapState::Start;
        let mut committed = None;
        let mut queue = VecDeque::from([BootstrapEvent::Launched {
            permission,
            push_token,
        }]);

        while let Some(event) = queue.pop_front() {
            let (next, actions) =
                BootstrapMachine::transition(state, event, self.clock.now_ms());
            state = next;
            for action in actions {
                if let Some(follow_up) = self.perform(action, &mut committed).await {
                    queue.push_back(follow_up);
                }
            }
        }

        match committed {
            Some(result) => result,
            None => {
                // Every machine path ends in a Commit action, so this only
                // fires if the machine and driver disagree about the flow.
                error!("bootstrap drained without committing, falling back to safe default");
                let result = AppBootstrapResult::logged_out(false, permission);
                self.state.commit(result.clone());
                result
            }
        }
    }

    async fn perform(
        &self,
        action: BootstrapAction,
        committed: &mut Option<AppBootstrapResult>,
    ) -> Option<BootstrapEvent> {
        match action {
            BootstrapAction::LoadOnboardingFlag => {
                match self.store.get(keys::ONBOARDING_COMPLETED).await {
                    Ok(value) => Some(BootstrapEvent::OnboardingFlagLoaded {
                        completed: flag_is_set(value.as_deref()),
                    }),
                    Err(err) => {
                        warn!(error = %err, "onboarding flag unreadable");
                        Some(BootstrapEvent::StepFailed {
                            failure: BootstrapFailure::PersistenceFailure(err.to_string()),
                        })
                    }
                }
            }
            BootstrapAction::LoadStoredSession => match self.credentials.stored_session().await {
                Ok(session) => Some(BootstrapEvent::SessionLoaded { session }),
                Err(err) => {
                    warn!(error = %err, "stored session unreadable");
                    Some(BootstrapEvent::StepFailed {
                        failure: BootstrapFailure::PersistenceFailure(err.to_string()),
                    })
                }
            },
            BootstrapAction::FetchProfile => match self.api.fetch_profile().await {
                Ok(profile) => Some(BootstrapEvent::ProfileFetched { profile }),
                Err(err) => {
                    let failure = if err.is_auth_failure() {
                        BootstrapFailure::SessionInvalid
                    } else {
                        BootstrapFailure::NetworkFailure(err.to_string())
                    };
                    warn!(error = %err, "profile fetch failed, treating session as dead");
                    Some(BootstrapEvent::ProfileFetchFailed { failure })
                }
            },
            BootstrapAction::ClearStoredSession => {
                // A failed clear leaves an invalid token on disk; the next
                // run detects and clears it again. Not worth failing over.
                if let Err(err) = self.credentials.clear().await {
                    error!(error = %err, "could not clear stored session");
                }
                None
            }
            BootstrapAction::RegisterPushToken { user_id, token } => {
                let registration = PushTokenRegistration { user_id, token };
                match self.api.register_push_token(&registration).await {
                    Ok(()) => {
                        info!("push token registered with backend");
                        Some(BootstrapEvent::PushTokenRegistered)
                    }
                    Err(err) => {
                        warn!(error = %err, "push token registration failed, continuing without it");
                        Some(BootstrapEvent::PushTokenRegistrationFailed {
                            failure: BootstrapFailure::NetworkFailure(err.to_string()),
                        })
                    }
                }
            }
            BootstrapAction::Commit { result } => {
                let result = self.finalize(result).await;
                self.state.commit(result.clone());
                *committed = Some(result);
                None
            }
        }
    }

    /// Commit-time staleness check.
    ///
    /// The store is the source of truth at the moment of commit: if a
    /// logout emptied it while profile or registration calls were in
    /// flight, a logged-in result must not resurrect the session.
    async fn finalize(&self, result: AppBootstrapResult) -> AppBootstrapResult {
        if !result.logged_in {
            return result;
        }
        match self.credentials.token().await {
            Ok(Some(_)) => result,
            Ok(None) => {
                info!("session was cleared mid-bootstrap, committing logged out");
                AppBootstrapResult::logged_out(
                    result.has_completed_onboarding,
                    result.notification_permission,
                )
            }
            Err(err) => {
                warn!(error = %err, "could not confirm session at commit time");
                AppBootstrapResult::logged_out(
                    result.has_completed_onboarding,
                    result.notification_permission,
                )
            }
        }
    }

    /// Channel declaration is idempotent on the platform side and must
    /// happen before the first message can be displayed.
    async fn declare_channels(&self) {
        for spec in &self.channels {
            if let Err(err) = self.renderer.create_channel(spec).await {
                warn!(channel = %spec.id, error = %err, "channel declaration failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::{mpsc, Notify};

    use hn_core::notification::standard_channels;
    use hn_core::ports::{
        ApiError, KeyValueStoreError, OsFamily, OsInfo, PlatformPort, PushError, PushMessagingPort,
    };
    use hn_core::{PushMessage, UserProfile};
    use hn_infra::kv::MemoryKeyValueStore;

    use super::*;

    const NOW_MS: i64 = 1_700_000_000_000;

    struct FixedClock;

    impl ClockPort for FixedClock {
        fn now_ms(&self) -> i64 {
            NOW_MS
        }
    }

    struct MockApi {
        profile: Result<UserProfile, ApiError>,
        register_result: Result<(), ApiError>,
        profile_calls: AtomicUsize,
        register_calls: AtomicUsize,
        profile_entered: Option<Arc<Notify>>,
        profile_gate: Option<Arc<Notify>>,
    }

    impl MockApi {
        fn with_profile(profile: UserProfile) -> Self {
            Self {
                profile: Ok(profile),
                register_result: Ok(()),
                profile_calls: AtomicUsize::new(0),
                register_calls: AtomicUsize::new(0),
                profile_entered: None,
                profile_gate: None,
            }
        }

        fn rejecting() -> Self {
            Self {
                profile: Err(ApiError::Unauthorized),
                ..Self::with_profile(UserProfile::new("unused", "unused"))
            }
        }
    }

    #[async_trait]
    impl ApiClientPort for MockApi {
        async fn login(
            &self,
            _credentials: &hn_core::LoginCredentials,
        ) -> Result<hn_core::AuthSession, ApiError> {
            Err(ApiError::Status {
                status: 501,
                message: "not exercised by this test".into(),
            })
        }

        async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
            if let Some(entered) = &self.profile_entered {
                entered.notify_one();
            }
            if let Some(gate) = &self.profile_gate {
                gate.notified().await;
            }
            self.profile_calls.fetch_add(1, Ordering::SeqCst);
            self.profile.clone()
        }

        async fn register_push_token(
            &self,
            _registration: &PushTokenRegistration,
        ) -> Result<(), ApiError> {
            self.register_calls.fetch_add(1, Ordering::SeqCst);
            self.register_result.clone()
        }

        async fn fetch_notifications(
            &self,
        ) -> Result<Vec<hn_core::NotificationRecord>, ApiError> {
            Ok(Vec::new())
        }

        async fn mark_notification_read(&self, _id: &str) -> Result<(), ApiError> {
            Ok(())
        }
    }

    struct MockMessaging {
        token: Option<String>,
    }

    #[async_trait]
    impl PushMessagingPort for MockMessaging {
        async fn request_permission(&self) -> Result<hn_core::PermissionStatus, PushError> {
            Ok(hn_core::PermissionStatus::Authorized)
        }

        async fn token(&self) -> Result<String, PushError> {
            self.token.clone().ok_or(PushError::TokenMissing)
        }

        async fn subscribe_token_refresh(&self) -> Result<mpsc::Receiver<String>, PushError> {
            let (_tx, rx) = mpsc::channel(1);
            Ok(rx)
        }

        async fn subscribe_foreground_messages(
            &self,
        ) -> Result<mpsc::Receiver<PushMessage>, PushError> {
            let (_tx, rx) = mpsc::channel(1);
            Ok(rx)
        }

        async fn subscribe_opened_notifications(
            &self,
        ) -> Result<mpsc::Receiver<PushMessage>, PushError> {
            let (_tx, rx) = mpsc::channel(1);
            Ok(rx)
        }

        async fn take_initial_message(&self) -> Result<Option<PushMessage>, PushError> {
            Ok(None)
        }
    }

    struct MockPlatform;

    #[async_trait]
    impl PlatformPort for MockPlatform {
        fn os(&self) -> OsInfo {
            OsInfo::new(OsFamily::Android, 34)
        }

        async fn request_post_notifications(
            &self,
        ) -> anyhow::Result<hn_core::PermissionStatus> {
            Ok(hn_core::PermissionStatus::Authorized)
        }
    }

    struct MockRenderer {
        declared: std::sync::Mutex<Vec<String>>,
    }

    impl MockRenderer {
        fn new() -> Self {
            Self {
                declared: std::sync::Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl NotificationRendererPort for MockRenderer {
        async fn create_channel(&self, spec: &NotificationChannelSpec) -> anyhow::Result<()> {
            self.declared.lock().unwrap().push(spec.id.clone());
            Ok(())
        }

        async fn display(
            &self,
            _notification: &hn_core::LocalNotification,
        ) -> anyhow::Result<()> {
            Ok(())
        }
    }

    struct FailingStore;

    #[async_trait]
    impl KeyValueStorePort for FailingStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, KeyValueStoreError> {
            Err(KeyValueStoreError::Backend("disk gone".into()))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), KeyValueStoreError> {
            Err(KeyValueStoreError::Backend("disk gone".into()))
        }

        async fn remove(&self, _key: &str) -> Result<(), KeyValueStoreError> {
            Err(KeyValueStoreError::Backend("disk gone".into()))
        }

        async fn clear(&self) -> Result<(), KeyValueStoreError> {
            Err(KeyValueStoreError::Backend("disk gone".into()))
        }
    }

    struct Harness {
        app: Arc<BootstrapApp>,
        api: Arc<MockApi>,
        store: Arc<dyn KeyValueStorePort>,
        renderer: Arc<MockRenderer>,
        state: SessionStateHandle,
        credentials: Arc<CredentialStore>,
    }

    fn harness_with(
        api: MockApi,
        store: Arc<dyn KeyValueStorePort>,
        device_token: Option<&str>,
    ) -> Harness {
        let api = Arc::new(api);
        let clock: Arc<dyn ClockPort> = Arc::new(FixedClock);
        let credentials = Arc::new(CredentialStore::new(store.clone(), clock.clone()));
        let provider = Arc::new(PushTokenProvider::new(
            Arc::new(MockMessaging {
                token: device_token.map(str::to_string),
            }),
            Arc::new(MockPlatform),
            store.clone(),
        ));
        let renderer = Arc::new(MockRenderer::new());
        let state = SessionStateHandle::new();
        let app = Arc::new(BootstrapApp::new(
            credentials.clone(),
            provider,
            api.clone(),
            store.clone(),
            renderer.clone(),
            clock,
            state.clone(),
            standard_channels(),
        ));
        Harness {
            app,
            api,
            store,
            renderer,
            state,
            credentials,
        }
    }

    fn harness(api: MockApi, device_token: Option<&str>) -> Harness {
        harness_with(api, Arc::new(MemoryKeyValueStore::new()), device_token)
    }

    #[tokio::test]
    async fn test_execute_valid_session_commits_logged_in() {
        let h = harness(
            MockApi::with_profile(UserProfile::new("u1", "Ana")),
            Some("fcm-1"),
        );
        h.credentials.save("tok", 60).await.unwrap();

        let result = h.app.execute().await;

        assert!(result.logged_in);
        assert!(result.has_completed_onboarding);
        assert_eq!(
            result.user_profile.as_ref().map(|p| p.id.as_str()),
            Some("u1")
        );
        assert_eq!(h.api.profile_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.api.register_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.state.current(), Some(result));
        assert_eq!(
            h.renderer.declared.lock().unwrap().as_slice(),
            ["default", "high_priority"]
        );
    }

    #[tokio::test]
    async fn test_execute_twice_on_unchanged_store_commits_equal_results() {
        let h = harness(
            MockApi::with_profile(UserProfile::new("u1", "Ana")),
            Some("fcm-1"),
        );
        h.credentials.save("tok", 60).await.unwrap();

        let first = h.app.execute().await;
        let second = h.app.execute().await;

        assert_eq!(first, second);
        // The second call really re-ran the flow rather than serving a cache.
        assert_eq!(h.api.profile_calls.load(Ordering::SeqCst), 2);
        assert_eq!(h.state.current(), Some(second));
    }

    #[tokio::test]
    async fn test_execute_empty_store_commits_logged_out_without_network() {
        let h = harness(
            MockApi::with_profile(UserProfile::new("u1", "Ana")),
            Some("fcm-1"),
        );

        let result = h.app.execute().await;

        assert!(!result.logged_in);
        assert!(!result.has_completed_onboarding);
        assert_eq!(result.user_profile, None);
        assert_eq!(h.api.profile_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.api.register_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_execute_expired_token_is_destroyed() {
        let h = harness(
            MockApi::with_profile(UserProfile::new("u1", "Ana")),
            Some("fcm-1"),
        );
        h.store.set(keys::ONBOARDING_COMPLETED, "true").await.unwrap();
        h.store.set(keys::ACCESS_TOKEN, "tok").await.unwrap();
        h.store
            .set(keys::TOKEN_EXPIRY, &(NOW_MS - 1).to_string())
            .await
            .unwrap();

        let result = h.app.execute().await;

        assert!(!result.logged_in);
        assert!(result.has_completed_onboarding);
        assert_eq!(h.store.get(keys::ACCESS_TOKEN).await.unwrap(), None);
        assert_eq!(h.store.get(keys::TOKEN_EXPIRY).await.unwrap(), None);
        assert_eq!(h.api.profile_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_execute_backend_rejection_logs_out_and_keeps_flag() {
        let h = harness(MockApi::rejecting(), None);
        h.store.set(keys::ONBOARDING_COMPLETED, "true").await.unwrap();
        h.credentials.save("tok", 60).await.unwrap();

        let result = h.app.execute().await;

        assert!(!result.logged_in);
        assert!(result.has_completed_onboarding);
        assert_eq!(h.store.get(keys::ACCESS_TOKEN).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_execute_registration_failure_still_logged_in() {
        let mut api = MockApi::with_profile(UserProfile::new("u1", "Ana"));
        api.register_result = Err(ApiError::Network("timeout".into()));
        let h = harness(api, Some("fcm-1"));
        h.credentials.save("tok", 60).await.unwrap();

        let result = h.app.execute().await;

        assert!(result.logged_in);
        assert_eq!(h.api.register_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_execute_store_failure_commits_safe_default() {
        let h = harness_with(
            MockApi::with_profile(UserProfile::new("u1", "Ana")),
            Arc::new(FailingStore),
            None,
        );

        let result = h.app.execute().await;

        assert!(!result.logged_in);
        assert!(!result.has_completed_onboarding);
        assert_eq!(result.user_profile, None);
        assert_eq!(h.api.profile_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.state.current(), Some(result));
    }

    #[tokio::test]
    async fn test_execute_is_single_flight() {
        let mut api = MockApi::with_profile(UserProfile::new("u1", "Ana"));
        let gate = Arc::new(Notify::new());
        let entered = Arc::new(Notify::new());
        api.profile_gate = Some(gate.clone());
        api.profile_entered = Some(entered.clone());
        let h = harness(api, None);
        h.credentials.save("tok", 60).await.unwrap();

        // Drive both callers and the gate from one task so the interleaving
        // is fixed: the second caller joins while the first holds the lock.
        let (first, second, _) = tokio::join!(h.app.execute(), h.app.execute(), async {
            entered.notified().await;
            gate.notify_one();
        });

        assert_eq!(first, second);
        assert_eq!(h.api.profile_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_execute_logout_mid_flight_commits_logged_out() {
        let mut api = MockApi::with_profile(UserProfile::new("u1", "Ana"));
        let gate = Arc::new(Notify::new());
        let entered = Arc::new(Notify::new());
        api.profile_gate = Some(gate.clone());
        api.profile_entered = Some(entered.clone());
        let h = harness(api, None);
        h.credentials.save("tok", 60).await.unwrap();

        // Logout lands while the profile call is still in flight.
        let (result, _) = tokio::join!(h.app.execute(), async {
            entered.notified().await;
            h.credentials.clear().await.unwrap();
            gate.notify_one();
        });

        assert!(!result.logged_in);
        assert_eq!(result.user_profile, None);
    }
}
