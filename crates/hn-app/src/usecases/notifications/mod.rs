//! Notification use cases and the inbox synchronizer.

use std::sync::Arc;

use tokio::sync::RwLock;

use hn_core::NotificationInbox;

pub mod list_notifications;
pub mod mark_all_notifications_read;
pub mod mark_notification_read;
pub mod reconcile_inbox;
pub mod synchronizer;

/// The session-scoped inbox, shared between the synchronizer worker and
/// the read-side use cases.
pub type SharedInbox = Arc<RwLock<NotificationInbox>>;

pub use list_notifications::ListNotifications;
pub use mark_all_notifications_read::MarkAllNotificationsRead;
pub use mark_notification_read::MarkNotificationRead;
pub use reconcile_inbox::ReconcileInbox;
pub use synchronizer::NotificationSynchronizer;
