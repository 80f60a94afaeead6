use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::NotificationId;
use crate::push::PushMessage;

/// A notification delivered to this device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    pub id: NotificationId,
    pub title: String,
    pub body: String,
    /// Provider data payload, kept verbatim for deep links.
    #[serde(default)]
    pub payload: BTreeMap<String, String>,
    pub received_at: DateTime<Utc>,
    pub read: bool,
}

impl NotificationRecord {
    /// Build a record from a delivered push message.
    ///
    /// The provider message id becomes the record id so the same message
    /// seen through several delivery paths stays one record. Messages
    /// without an id get a locally generated one.
    pub fn from_message(message: &PushMessage, received_at: DateTime<Utc>) -> Self {
        let id = message
            .message_id
            .clone()
            .map(NotificationId::from_string)
            .unwrap_or_default();
        Self {
            id,
            title: message.title.clone().unwrap_or_default(),
            body: message.body.clone().unwrap_or_default(),
            payload: message.data.clone(),
            received_at,
            read: false,
        }
    }

    pub fn mark_read(&mut self) {
        self.read = true;
    }
}
