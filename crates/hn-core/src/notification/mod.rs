//! Notification domain: delivered records, the in-memory inbox and the
//! Android channel layout.

pub mod channel;
pub mod inbox;
pub mod record;

pub use channel::{
    standard_channels, ChannelImportance, LocalNotification, NotificationChannelSpec,
    CHANNEL_DEFAULT, CHANNEL_HIGH_PRIORITY,
};
pub use inbox::NotificationInbox;
pub use record::NotificationRecord;
