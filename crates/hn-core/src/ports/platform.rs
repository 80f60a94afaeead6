//! Host platform port
//!
//! What the shell knows about the device: which OS family and version the
//! process is running on, and the OS-level permission prompt that newer
//! Android versions require.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::push::PermissionStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Android,
    Ios,
    Other,
}

/// Identity of the host OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsInfo {
    pub family: OsFamily,
    /// Android API level, iOS major version. Zero when unknown.
    pub major_version: u32,
}

impl OsInfo {
    pub fn new(family: OsFamily, major_version: u32) -> Self {
        Self {
            family,
            major_version,
        }
    }
}

#[async_trait]
pub trait PlatformPort: Send + Sync {
    fn os(&self) -> OsInfo;

    /// Show the OS `POST_NOTIFICATIONS` prompt. Only meaningful on
    /// Android 13 and later; other platforms never get this call.
    async fn request_post_notifications(&self) -> anyhow::Result<PermissionStatus>;
}
