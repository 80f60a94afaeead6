//! Backend API client port
//!
//! The contract for everything the client asks of the customer backend.
//! Implementations attach the bearer token themselves, through
//! [`crate::ports::AccessTokenProviderPort`], so use cases never handle
//! raw tokens on the way out.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::auth::{AuthSession, LoginCredentials, UserProfile};
use crate::ids::UserId;
use crate::notification::NotificationRecord;

/// Device push-token registration payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushTokenRegistration {
    pub user_id: UserId,
    pub token: String,
}

#[async_trait]
pub trait ApiClientPort: Send + Sync {
    /// Exchange credentials for a session. No bearer token is attached.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, ApiError>;

    /// Fetch the profile of the session owner. A 401 surfaces as
    /// [`ApiError::Unauthorized`]; callers treat that as a dead session.
    async fn fetch_profile(&self) -> Result<UserProfile, ApiError>;

    /// Register the device push token for this customer. Re-registering
    /// the same value is accepted by the backend.
    async fn register_push_token(
        &self,
        registration: &PushTokenRegistration,
    ) -> Result<(), ApiError>;

    /// Fetch the canonical notification list, newest first.
    async fn fetch_notifications(&self) -> Result<Vec<NotificationRecord>, ApiError>;

    /// Mark one notification read on the backend.
    async fn mark_notification_read(&self, id: &str) -> Result<(), ApiError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// The backend rejected the bearer token.
    #[error("unauthorized")]
    Unauthorized,

    /// The request never completed: DNS, connect, timeout.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with an unexpected status.
    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether this error means the session itself is dead, as opposed to
    /// a transient transport problem.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}
