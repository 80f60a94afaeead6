//! # hn-core
//!
//! Core domain models and business logic for HomeNet.
//!
//! Session and notification types, the bootstrap state machine, and the
//! ports. Nothing in this crate touches the network or the disk.

// Public module exports
pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod ids;
pub mod notification;
pub mod ports;
pub mod push;
pub mod storage;

// Re-export commonly used types at the crate root
pub use auth::{AuthSession, LoginCredentials, StoredSession, UserProfile};
pub use bootstrap::{AppBootstrapResult, BootstrapFailure, BootstrapMachine, BootstrapState};
pub use config::CoreConfig;
pub use ids::{NotificationId, UserId};
pub use notification::{LocalNotification, NotificationInbox, NotificationRecord};
pub use push::{PermissionStatus, PushMessage, PushToken};
