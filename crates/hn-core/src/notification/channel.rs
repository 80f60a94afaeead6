use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::record::NotificationRecord;

/// Channel for routine notices: invoices, plan changes, service news.
pub const CHANNEL_DEFAULT: &str = "default";
/// Channel for heads-up alerts: outages, payment failures.
pub const CHANNEL_HIGH_PRIORITY: &str = "high_priority";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelImportance {
    Default,
    High,
}

/// Android notification channel description.
///
/// Channel creation is idempotent on the platform side, so these are
/// declared every cold start without checking whether they already exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationChannelSpec {
    pub id: String,
    pub name: String,
    pub importance: ChannelImportance,
}

impl NotificationChannelSpec {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        importance: ChannelImportance,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            importance,
        }
    }
}

/// The channels every installation declares at startup.
pub fn standard_channels() -> Vec<NotificationChannelSpec> {
    vec![
        NotificationChannelSpec::new(CHANNEL_DEFAULT, "General", ChannelImportance::Default),
        NotificationChannelSpec::new(CHANNEL_HIGH_PRIORITY, "Alerts", ChannelImportance::High),
    ]
}

/// Payload handed to the local renderer for immediate display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalNotification {
    pub channel_id: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub payload: BTreeMap<String, String>,
}

impl LocalNotification {
    /// Render a stored record on the given channel.
    pub fn from_record(record: &NotificationRecord, channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            title: record.title.clone(),
            body: record.body.clone(),
            payload: record.payload.clone(),
        }
    }
}
