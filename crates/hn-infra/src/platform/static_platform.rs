//! Fixed host-platform description.
//!
//! The shell that embeds the core knows what it runs on; this adapter just
//! carries that answer. The `POST_NOTIFICATIONS` outcome is canned too,
//! which is all a desktop preview or a test needs.

use async_trait::async_trait;

use hn_core::ports::{OsInfo, PlatformPort};
use hn_core::push::PermissionStatus;

pub struct StaticPlatform {
    os: OsInfo,
    post_notifications: PermissionStatus,
}

impl StaticPlatform {
    pub fn new(os: OsInfo) -> Self {
        Self {
            os,
            post_notifications: PermissionStatus::Authorized,
        }
    }

    /// Fix the answer the `POST_NOTIFICATIONS` prompt returns.
    pub fn with_post_notifications(mut self, status: PermissionStatus) -> Self {
        self.post_notifications = status;
        self
    }
}

#[async_trait]
impl PlatformPort for StaticPlatform {
    fn os(&self) -> OsInfo {
        self.os
    }

    async fn request_post_notifications(&self) -> anyhow::Result<PermissionStatus> {
        Ok(self.post_notifications)
    }
}
