//! Core configuration domain model

pub mod core_config;

pub use core_config::{ApiConfig, CoreConfig, NotificationsConfig};
