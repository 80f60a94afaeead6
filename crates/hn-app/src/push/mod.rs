//! Push concerns owned by the application layer.

pub mod provider;

pub use provider::PushTokenProvider;
