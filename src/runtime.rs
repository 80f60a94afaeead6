//! # Runtime Assembly / 运行时装配
//!
//! The one place that depends on `hn-app` and `hn-infra` at the same
//! time. Adapters are created here, injected into the use cases, and the
//! assembled runtime is handed to the shell. Assembly only: nothing in
//! this module makes a business decision.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{watch, RwLock};

use hn_app::{
    BootstrapApp, CompleteOnboarding, CoreDeps, CredentialStore, ListNotifications, Login, Logout,
    MarkAllNotificationsRead, MarkNotificationRead, NotificationSynchronizer, PushTokenProvider,
    ReconcileInbox, SessionStateHandle,
};
use hn_core::config::CoreConfig;
use hn_core::notification::NotificationInbox;
use hn_core::ports::{
    ApiClientPort, ClockPort, KeyValueStorePort, NotificationRendererPort, OsFamily, OsInfo,
    PlatformPort, PushMessagingPort,
};
use hn_core::AppBootstrapResult;
use hn_infra::{
    ChannelPushMessaging, FileKeyValueStore, HttpApiClient, StaticPlatform, SystemClock,
    TracingNotificationRenderer,
};

/// Assembled HomeNet core.
///
/// 装配完成的 HomeNet 核心。
///
/// Holds the shared session plumbing (credential store, push-token
/// provider, notification synchronizer, committed state) and hands out
/// use cases through [`CoreRuntime::usecases`]. One instance lives for
/// the whole process.
pub struct CoreRuntime {
    /// The injected ports and configuration.
    pub deps: CoreDeps,
    credentials: Arc<CredentialStore>,
    provider: Arc<PushTokenProvider>,
    synchronizer: Arc<NotificationSynchronizer>,
    /// Cached resolver: every caller must share the single-flight guard,
    /// so this is built once and cloned out.
    bootstrap: Arc<BootstrapApp>,
    state: SessionStateHandle,
}

impl CoreRuntime {
    pub fn new(deps: CoreDeps) -> Self {
        let credentials = Arc::new(CredentialStore::new(deps.store.clone(), deps.clock.clone()));
        let provider = Arc::new(PushTokenProvider::new(
            deps.messaging.clone(),
            deps.platform.clone(),
            deps.store.clone(),
        ));
        let inbox = Arc::new(RwLock::new(NotificationInbox::new()));
        let synchronizer = Arc::new(NotificationSynchronizer::new(
            deps.messaging.clone(),
            deps.renderer.clone(),
            deps.api.clone(),
            provider.clone(),
            deps.clock.clone(),
            inbox,
        ));
        let state = SessionStateHandle::new();
        let bootstrap = Arc::new(BootstrapApp::new(
            credentials.clone(),
            provider.clone(),
            deps.api.clone(),
            deps.store.clone(),
            deps.renderer.clone(),
            deps.clock.clone(),
            state.clone(),
            deps.config.notifications.channels.clone(),
        ));

        Self {
            deps,
            credentials,
            provider,
            synchronizer,
            bootstrap,
            state,
        }
    }

    /// Boot from disk: read `homenet.toml` from the platform config
    /// path (defaults when the file is absent), then assemble the
    /// default wiring with [`CoreRuntime::from_config`].
    pub fn from_disk() -> anyhow::Result<Self> {
        let config_path = hn_infra::fs::default_config_path()?;
        let config = hn_infra::settings::load_config_or_default(&config_path)?;
        Self::from_config(config)
    }

    /// Default wiring: file store in the platform data directory, HTTP
    /// client against the configured backend, system clock, in-process
    /// push transport.
    ///
    /// This is what desktop previews and tests run on. Phone shells
    /// build [`CoreDeps`] with their own platform adapters and call
    /// [`CoreRuntime::new`] instead.
    pub fn from_config(config: CoreConfig) -> anyhow::Result<Self> {
        let base_dir = hn_infra::fs::app_data_dir()?;
        Self::with_base_dir(config, base_dir)
    }

    /// [`CoreRuntime::from_config`] over an explicit data directory.
    pub fn with_base_dir(config: CoreConfig, base_dir: PathBuf) -> anyhow::Result<Self> {
        let store: Arc<dyn KeyValueStorePort> =
            Arc::new(FileKeyValueStore::with_defaults(base_dir));
        let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);
        // A second view over the same session keys: the HTTP layer reads
        // whatever token the session layer last wrote.
        let tokens = Arc::new(CredentialStore::new(store.clone(), clock.clone()));
        let api: Arc<dyn ApiClientPort> = Arc::new(HttpApiClient::new(&config.api, tokens)?);
        let messaging: Arc<dyn PushMessagingPort> = Arc::new(ChannelPushMessaging::new());
        let renderer: Arc<dyn NotificationRendererPort> =
            Arc::new(TracingNotificationRenderer::new());
        let platform: Arc<dyn PlatformPort> =
            Arc::new(StaticPlatform::new(OsInfo::new(OsFamily::Other, 0)));

        Ok(Self::new(CoreDeps {
            api,
            store,
            messaging,
            renderer,
            platform,
            clock,
            config,
        }))
    }

    /// Get the use cases accessor.
    /// 获取用例访问器。
    pub fn usecases(&self) -> UseCases<'_> {
        UseCases::new(self)
    }

    /// The committed session state every use case writes into.
    pub fn session_state(&self) -> SessionStateHandle {
        self.state.clone()
    }

    /// A receiver of committed bootstrap results, for the shell's
    /// navigation layer. The current value is observable immediately.
    pub fn subscribe_session(&self) -> watch::Receiver<Option<AppBootstrapResult>> {
        self.state.subscribe()
    }

    /// The long-lived notification synchronizer. The shell starts it
    /// after a logged-in result and stops it on logout or shutdown.
    pub fn synchronizer(&self) -> Arc<NotificationSynchronizer> {
        self.synchronizer.clone()
    }
}

/// Use case accessor for [`CoreRuntime`].
///
/// [`CoreRuntime`] 的用例访问器。
///
/// Stateless use cases are constructed fresh per call; anything carrying
/// shared state (the resolver's single-flight guard, the inbox) comes
/// out of the runtime's cached instances.
pub struct UseCases<'a> {
    runtime: &'a CoreRuntime,
}

impl<'a> UseCases<'a> {
    pub fn new(runtime: &'a CoreRuntime) -> Self {
        Self { runtime }
    }

    /// Cold-start session resolver.
    pub fn bootstrap_app(&self) -> Arc<BootstrapApp> {
        self.runtime.bootstrap.clone()
    }

    /// Credential exchange and session persistence.
    pub fn login(&self) -> Login {
        Login::new(
            self.runtime.deps.api.clone(),
            self.runtime.credentials.clone(),
            self.runtime.provider.clone(),
            self.runtime.state.clone(),
        )
    }

    /// Persist the once-only onboarding flag.
    pub fn complete_onboarding(&self) -> CompleteOnboarding {
        CompleteOnboarding::new(self.runtime.deps.store.clone(), self.runtime.state.clone())
    }

    /// Tear the session down and commit the logged-out state.
    pub fn logout(&self) -> Logout {
        Logout::new(
            self.runtime.credentials.clone(),
            self.runtime.deps.store.clone(),
            self.runtime.synchronizer.clone(),
            self.runtime.state.clone(),
        )
    }

    /// Read the in-memory inbox.
    pub fn list_notifications(&self) -> ListNotifications {
        ListNotifications::new(self.runtime.synchronizer.inbox())
    }

    /// Mark one record read, locally and on the backend.
    pub fn mark_notification_read(&self) -> MarkNotificationRead {
        MarkNotificationRead::new(
            self.runtime.synchronizer.inbox(),
            self.runtime.deps.api.clone(),
        )
    }

    /// Mark everything read, locally and on the backend.
    pub fn mark_all_notifications_read(&self) -> MarkAllNotificationsRead {
        MarkAllNotificationsRead::new(
            self.runtime.synchronizer.inbox(),
            self.runtime.deps.api.clone(),
        )
    }

    /// Replace the inbox with the backend's canonical list.
    pub fn reconcile_inbox(&self) -> ReconcileInbox {
        ReconcileInbox::new(
            self.runtime.synchronizer.inbox(),
            self.runtime.deps.api.clone(),
        )
    }
}
