//! Persisted key-value layout.
//!
//! 持久化键值布局。
//!
//! The namespace is flat and shared with the mobile shells, so these keys
//! must stay stable across releases. Values are strings; booleans are
//! stored as `"true"` and read as absent-means-false.

pub mod keys {
    /// Bearer token issued at login.
    pub const ACCESS_TOKEN: &str = "access_token";
    /// Absolute token expiry, epoch milliseconds, stringified.
    pub const TOKEN_EXPIRY: &str = "token_expiry";
    /// Set once the intro carousel has been dismissed. Survives logout.
    pub const ONBOARDING_COMPLETED: &str = "onboarding_completed";
    /// Last push token obtained from the provider.
    pub const PUSH_TOKEN_CACHE: &str = "fcm_token";
}

/// Canonical value for persisted boolean flags.
pub const FLAG_TRUE: &str = "true";

/// Reads a persisted flag value. Anything but the canonical value,
/// including absence, is `false`.
pub fn flag_is_set(value: Option<&str>) -> bool {
    value == Some(FLAG_TRUE)
}
