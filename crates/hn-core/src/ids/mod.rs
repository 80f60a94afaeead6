//! ID type wrappers for type safety.

pub(crate) mod id_macro;
pub mod notification_id;
pub mod user_id;

pub use notification_id::NotificationId;
pub use user_id::UserId;
