//! Use case for logging a customer in
//! 用户登录用例

use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument};

use hn_core::ports::{ApiClientPort, ApiError, PushTokenRegistration};
use hn_core::{AppBootstrapResult, LoginCredentials, PermissionStatus, UserProfile};

use crate::push::PushTokenProvider;
use crate::session::{CredentialStore, SessionStateHandle};

/// Error type for login failures.
/// 登录失败的错误类型。
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("network error: {0}")]
    Network(String),

    #[error("could not persist session: {0}")]
    Persistence(String),
}

impl From<ApiError> for LoginError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => LoginError::InvalidCredentials,
            other => LoginError::Network(other.to_string()),
        }
    }
}

/// Use case for authenticating a customer.
///
/// ## Behavior / 行为
/// - Exchanges credentials for a session, persists it, then commits the
///   logged-in state. The persist is fully awaited before the commit so
///   an immediately following bootstrap sees the token.
/// - Push registration is attempted but never blocks a successful login.
pub struct Login {
    api: Arc<dyn ApiClientPort>,
    credentials: Arc<CredentialStore>,
    provider: Arc<PushTokenProvider>,
    state: SessionStateHandle,
}

impl Login {
    pub fn new(
        api: Arc<dyn ApiClientPort>,
        credentials: Arc<CredentialStore>,
        provider: Arc<PushTokenProvider>,
        state: SessionStateHandle,
    ) -> Self {
        Self {
            api,
            credentials,
            provider,
            state,
        }
    }

    /// Execute the use case.
    ///
    /// # Returns / 返回值
    /// - `Ok(UserProfile)` when the session was established and persisted
    /// - `Err(LoginError)` otherwise; the committed state is untouched
    pub async fn execute(&self, request: LoginCredentials) -> Result<UserProfile, LoginError> {
        let span = info_span!("usecase.login.execute");

        async {
            let session = self.api.login(&request).await?;
            self.credentials
                .save(&session.access_token, session.expires_in_secs)
                .await
                .map_err(|err| LoginError::Persistence(err.to_string()))?;

            if let Some(token) = self.provider.token().await {
                let registration = PushTokenRegistration {
                    user_id: session.profile.id.clone(),
                    token: token.value,
                };
                if let Err(err) = self.api.register_push_token(&registration).await {
                    warn!(error = %err, "push token registration failed at login");
                }
            }

            let permission = self
                .state
                .current()
                .map(|result| result.notification_permission)
                .unwrap_or(PermissionStatus::Denied);
            self.state
                .commit(AppBootstrapResult::logged_in(session.profile.clone(), permission));
            info!(user = %session.profile.id, "login complete");
            Ok(session.profile)
        }
        .instrument(span)
        .await
    }
}
