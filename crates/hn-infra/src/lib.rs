//! # hn-infra
//!
//! Infrastructure adapters for HomeNet: file and memory key-value stores,
//! the HTTP backend client, push messaging plumbing, and the system clock.
//! Everything here implements an `hn-core` port; nothing here holds
//! business rules.

pub mod api;
pub mod fs;
pub mod kv;
pub mod notification;
pub mod platform;
pub mod push;
pub mod settings;
pub mod time;

pub use api::HttpApiClient;
pub use kv::{FileKeyValueStore, MemoryKeyValueStore};
pub use notification::TracingNotificationRenderer;
pub use platform::StaticPlatform;
pub use push::ChannelPushMessaging;
pub use time::SystemClock;
