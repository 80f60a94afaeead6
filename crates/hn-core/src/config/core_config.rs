//! Core configuration domain model

use serde::{Deserialize, Serialize};

use crate::notification::{standard_channels, NotificationChannelSpec};

/// Configuration consumed by the core runtime.
///
/// This is the subset the shells need to hand over at startup; everything
/// platform-specific stays on the shell side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Backend API settings
    pub api: ApiConfig,

    /// Notification settings
    pub notifications: NotificationsConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the customer API, without a trailing slash
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// Notification configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Channels declared at startup
    pub channels: Vec<NotificationChannelSpec>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.homenet.example/v1".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            channels: standard_channels(),
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            notifications: NotificationsConfig::default(),
        }
    }
}

impl CoreConfig {
    /// Parse a TOML document. Missing sections fall back to defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}
