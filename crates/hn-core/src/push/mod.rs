//! Push messaging domain: permissions, device tokens and delivered messages.

pub mod message;
pub mod permission;
pub mod token;

pub use message::PushMessage;
pub use permission::{PermissionStatus, ANDROID_RUNTIME_PERMISSION_MIN_API};
pub use token::PushToken;
