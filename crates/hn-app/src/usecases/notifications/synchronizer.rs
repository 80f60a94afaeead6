//! Push delivery fan-in and inbox upkeep for a confirmed session.
//!
//! 会话期内推送消息的统一接入与收件箱维护。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn, Instrument};

use hn_core::notification::CHANNEL_HIGH_PRIORITY;
use hn_core::ports::{
    ApiClientPort, ClockPort, NotificationRendererPort, PushMessagingPort, PushTokenRegistration,
};
use hn_core::{LocalNotification, NotificationRecord, PushMessage, UserId};

use super::SharedInbox;
use crate::push::PushTokenProvider;

/// Fans the push delivery paths into the shared inbox and keeps the
/// backend's token registration current across rotations.
///
/// One worker task per confirmed session. [`start`](Self::start) is
/// idempotent while a worker is running; [`stop`](Self::stop) tears the
/// worker down and drops every subscription receiver, so nothing is
/// dispatched into a stale session after logout.
pub struct NotificationSynchronizer {
    messaging: Arc<dyn PushMessagingPort>,
    renderer: Arc<dyn NotificationRendererPort>,
    api: Arc<dyn ApiClientPort>,
    provider: Arc<PushTokenProvider>,
    clock: Arc<dyn ClockPort>,
    inbox: SharedInbox,
    worker: Mutex<Option<WorkerHandle>>,
    startup_consumed: AtomicBool,
}

struct WorkerHandle {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl NotificationSynchronizer {
    pub fn new(
        messaging: Arc<dyn PushMessagingPort>,
        renderer: Arc<dyn NotificationRendererPort>,
        api: Arc<dyn ApiClientPort>,
        provider: Arc<PushTokenProvider>,
        clock: Arc<dyn ClockPort>,
        inbox: SharedInbox,
    ) -> Self {
        Self {
            messaging,
            renderer,
            api,
            provider,
            clock,
            inbox,
            worker: Mutex::new(None),
            startup_consumed: AtomicBool::new(false),
        }
    }

    /// The inbox this synchronizer feeds, shared with the read-side use
    /// cases.
    pub fn inbox(&self) -> SharedInbox {
        self.inbox.clone()
    }

    /// Subscribe to the delivery streams and spawn the inbox worker.
    ///
    /// Idempotent while a worker is running. The notification that
    /// launched the app is consumed here exactly once per process, however
    /// many sessions come and go, so a login after logout cannot replay it.
    pub async fn start(&self, user_id: UserId) -> anyhow::Result<()> {
        let span = info_span!("notifications.synchronizer.start", user = %user_id);
        async {
            let mut guard = self.worker.lock().await;
            if guard.is_some() {
                debug!("synchronizer already running");
                return Ok(());
            }

            let foreground_rx = self.messaging.subscribe_foreground_messages().await?;
            let opened_rx = self.messaging.subscribe_opened_notifications().await?;
            let refresh_rx = self.provider.subscribe_token_refresh().await?;

            if !self.startup_consumed.swap(true, Ordering::SeqCst) {
                self.consume_startup_message().await;
            }

            // Seed the rotation duplicate check with the cached value, so
            // the provider re-announcing the current token after launch
            // does not trigger a pointless re-registration.
            let last_registered = self.provider.cached_token().await.map(|token| token.value);

            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            let worker = InboxWorker {
                foreground_rx,
                opened_rx,
                refresh_rx,
                shutdown_rx,
                renderer: self.renderer.clone(),
                api: self.api.clone(),
                provider: self.provider.clone(),
                clock: self.clock.clone(),
                inbox: self.inbox.clone(),
                user_id,
                last_registered,
            };
            let join = tokio::spawn(worker.run());
            *guard = Some(WorkerHandle { shutdown_tx, join });
            info!("notification synchronizer started");
            Ok(())
        }
        .instrument(span)
        .await
    }

    /// Stop the worker and release the subscriptions. Safe to call when
    /// nothing is running.
    pub async fn stop(&self) {
        let handle = self.worker.lock().await.take();
        let Some(handle) = handle else {
            return;
        };
        if handle.shutdown_tx.send(true).is_err() {
            debug!("inbox worker had already exited");
        }
        if let Err(err) = handle.join.await {
            warn!(error = %err, "inbox worker did not shut down cleanly");
        }
        info!("notification synchronizer stopped");
    }

    pub async fn is_running(&self) -> bool {
        self.worker.lock().await.is_some()
    }

    /// Record the notification that launched the app, if there was one.
    async fn consume_startup_message(&self) {
        match self.messaging.take_initial_message().await {
            Ok(Some(message)) => {
                let record = NotificationRecord::from_message(&message, timestamp(&*self.clock));
                let id = record.id.clone();
                if self.inbox.write().await.append_if_absent(record) {
                    info!(id = %id, "recorded the notification that launched the app");
                }
            }
            Ok(None) => {}
            Err(err) => warn!(error = %err, "could not read the launch notification"),
        }
    }
}

/// Owns the delivery receivers for the lifetime of one session.
struct InboxWorker {
    foreground_rx: mpsc::Receiver<PushMessage>,
    opened_rx: mpsc::Receiver<PushMessage>,
    refresh_rx: mpsc::Receiver<String>,
    shutdown_rx: watch::Receiver<bool>,
    renderer: Arc<dyn NotificationRendererPort>,
    api: Arc<dyn ApiClientPort>,
    provider: Arc<PushTokenProvider>,
    clock: Arc<dyn ClockPort>,
    inbox: SharedInbox,
    user_id: UserId,
    last_registered: Option<String>,
}

impl InboxWorker {
    /// Run until shutdown is signalled or a delivery stream closes.
    async fn run(mut self) {
        let span = info_span!("notifications.inbox_worker", user = %self.user_id);
        async move {
            debug!("inbox worker online");
            loop {
                tokio::select! {
                    changed = self.shutdown_rx.changed() => {
                        if changed.is_err() || *self.shutdown_rx.borrow() {
                            break;
                        }
                    }
                    message = self.foreground_rx.recv() => {
                        match message {
                            Some(message) => self.on_foreground(message).await,
                            None => {
                                debug!("foreground stream closed");
                                break;
                            }
                        }
                    }
                    message = self.opened_rx.recv() => {
                        match message {
                            Some(message) => self.on_opened(message).await,
                            None => {
                                debug!("opened-notification stream closed");
                                break;
                            }
                        }
                    }
                    value = self.refresh_rx.recv() => {
                        match value {
                            Some(value) => self.on_token_refresh(value).await,
                            None => {
                                debug!("token refresh stream closed");
                                break;
                            }
                        }
                    }
                }
            }
            debug!("inbox worker stopped");
        }
        .instrument(span)
        .await
    }

    /// A message arrived while the app is visible. The OS suppresses the
    /// provider's own banner in that state, so record it and render a
    /// local one on the heads-up channel.
    async fn on_foreground(&mut self, message: PushMessage) {
        let record = NotificationRecord::from_message(&message, timestamp(&*self.clock));
        let notification = LocalNotification::from_record(&record, CHANNEL_HIGH_PRIORITY);
        let id = record.id.clone();
        self.inbox.write().await.append(record);
        debug!(id = %id, "foreground message recorded");
        if let Err(err) = self.renderer.display(&notification).await {
            warn!(id = %id, error = %err, "local render failed, record kept");
        }
    }

    /// The user tapped a system-tray notification. The tray already showed
    /// it, so only record it, and only if the foreground path has not.
    async fn on_opened(&mut self, message: PushMessage) {
        let record = NotificationRecord::from_message(&message, timestamp(&*self.clock));
        let id = record.id.clone();
        if self.inbox.write().await.append_if_absent(record) {
            info!(id = %id, "recorded tapped notification");
        } else {
            debug!(id = %id, "tapped notification already in the inbox");
        }
    }

    /// The provider rotated the device token. Re-register it with the
    /// backend so pushes keep arriving.
    async fn on_token_refresh(&mut self, value: String) {
        // Rotations can arrive in bursts; only the newest value matters.
        let mut value = value;
        while let Ok(newer) = self.refresh_rx.try_recv() {
            value = newer;
        }

        if self.last_registered.as_deref() == Some(value.as_str()) {
            debug!("rotated token matches the registered one, skipping");
            return;
        }

        // Cache first: even if registration fails now, the next cold start
        // registers the newest value.
        self.provider.cache_token(&value).await;

        let registration = PushTokenRegistration {
            user_id: self.user_id.clone(),
            token: value.clone(),
        };
        match self.api.register_push_token(&registration).await {
            Ok(()) => {
                self.last_registered = Some(value);
                info!("rotated push token registered");
            }
            Err(err) => {
                warn!(error = %err, "rotated token registration failed, will retry on the next rotation");
            }
        }
    }
}

fn timestamp(clock: &dyn ClockPort) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(clock.now_ms()).unwrap_or_else(Utc::now)
}
