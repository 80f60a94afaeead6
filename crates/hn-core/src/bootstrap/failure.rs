use thiserror::Error;

/// Closed set of failures a bootstrap run can hit.
///
/// 启动流程可能遇到的失败类型（封闭集合）。
///
/// None of these abort the run. Each kind maps to a fixed degradation:
/// denial is recorded, missing tokens disable push, invalid sessions log
/// the user out, and store failures collapse to the safe default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BootstrapFailure {
    /// The user declined notification permission.
    #[error("notification permission denied")]
    PermissionDenied,
    /// No push token could be obtained from the provider.
    #[error("push token unavailable: {0}")]
    TokenUnavailable(String),
    /// The stored session is missing, expired, or was rejected by the
    /// backend with a 401.
    #[error("session invalid")]
    SessionInvalid,
    /// Profile fetch or push registration failed on the wire.
    #[error("network failure: {0}")]
    NetworkFailure(String),
    /// The key-value store failed to read or write.
    #[error("persistence failure: {0}")]
    PersistenceFailure(String),
}
