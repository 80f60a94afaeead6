//! In-process push transport.
//!
//! 进程内推送通道。
//!
//! A scriptable stand-in for the platform push provider. Desktop previews
//! and integration tests drive deliveries by hand through the `emit_*`
//! methods; on a phone the shell plugs in the real provider instead.
//!
//! Every `subscribe_*` call opens a fresh channel and replaces the stored
//! sender, so a consumer that stops and starts again gets a clean stream
//! instead of a closed one.

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;

use hn_core::ports::{PushError, PushMessagingPort};
use hn_core::push::{PermissionStatus, PushMessage};

const STREAM_CAPACITY: usize = 16;

pub struct ChannelPushMessaging {
    permission: Mutex<PermissionStatus>,
    token: Mutex<Option<String>>,
    initial: Mutex<Option<PushMessage>>,
    refresh_tx: Mutex<Option<mpsc::Sender<String>>>,
    foreground_tx: Mutex<Option<mpsc::Sender<PushMessage>>>,
    opened_tx: Mutex<Option<mpsc::Sender<PushMessage>>>,
}

impl ChannelPushMessaging {
    pub fn new() -> Self {
        Self {
            permission: Mutex::new(PermissionStatus::Authorized),
            token: Mutex::new(None),
            initial: Mutex::new(None),
            refresh_tx: Mutex::new(None),
            foreground_tx: Mutex::new(None),
            opened_tx: Mutex::new(None),
        }
    }

    /// Script the answer the next permission prompt returns.
    pub fn set_permission(&self, status: PermissionStatus) {
        *self.permission.lock().unwrap() = status;
    }

    /// Install the device token handed out by `token()`.
    pub fn set_token(&self, value: impl Into<String>) {
        *self.token.lock().unwrap() = Some(value.into());
    }

    /// Stage the message a cold start would carry.
    pub fn set_initial_message(&self, message: PushMessage) {
        *self.initial.lock().unwrap() = Some(message);
    }

    /// Deliver a foreground message. Returns `false` when no consumer is
    /// subscribed.
    pub async fn emit_foreground(&self, message: PushMessage) -> bool {
        let sender = self.foreground_tx.lock().unwrap().clone();
        match sender {
            Some(tx) => tx.send(message).await.is_ok(),
            None => false,
        }
    }

    /// Deliver a tapped-notification event.
    pub async fn emit_opened(&self, message: PushMessage) -> bool {
        let sender = self.opened_tx.lock().unwrap().clone();
        match sender {
            Some(tx) => tx.send(message).await.is_ok(),
            None => false,
        }
    }

    /// Rotate the device token: replaces the stored value and pushes the
    /// new one down the refresh stream.
    pub async fn rotate_token(&self, value: impl Into<String>) -> bool {
        let value = value.into();
        *self.token.lock().unwrap() = Some(value.clone());
        let sender = self.refresh_tx.lock().unwrap().clone();
        match sender {
            Some(tx) => tx.send(value).await.is_ok(),
            None => false,
        }
    }
}

impl Default for ChannelPushMessaging {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PushMessagingPort for ChannelPushMessaging {
    async fn request_permission(&self) -> Result<PermissionStatus, PushError> {
        Ok(*self.permission.lock().unwrap())
    }

    async fn token(&self) -> Result<String, PushError> {
        self.token
            .lock()
            .unwrap()
            .clone()
            .ok_or(PushError::TokenMissing)
    }

    async fn subscribe_token_refresh(&self) -> Result<mpsc::Receiver<String>, PushError> {
        let (tx, rx) = mpsc::channel(STREAM_CAPACITY);
        *self.refresh_tx.lock().unwrap() = Some(tx);
        Ok(rx)
    }

    async fn subscribe_foreground_messages(
        &self,
    ) -> Result<mpsc::Receiver<PushMessage>, PushError> {
        let (tx, rx) = mpsc::channel(STREAM_CAPACITY);
        *self.foreground_tx.lock().unwrap() = Some(tx);
        Ok(rx)
    }

    async fn subscribe_opened_notifications(
        &self,
    ) -> Result<mpsc::Receiver<PushMessage>, PushError> {
        let (tx, rx) = mpsc::channel(STREAM_CAPACITY);
        *self.opened_tx.lock().unwrap() = Some(tx);
        Ok(rx)
    }

    async fn take_initial_message(&self) -> Result<Option<PushMessage>, PushError> {
        Ok(self.initial.lock().unwrap().take())
    }
}
