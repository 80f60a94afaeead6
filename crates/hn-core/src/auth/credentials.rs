use serde::{Deserialize, Serialize};

use super::profile::UserProfile;

/// Credentials submitted by the customer at login.
///
/// `document` is the subscriber document number, the login identifier used
/// by the ISP backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub document: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(document: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            password: password.into(),
        }
    }
}

/// Successful authentication payload: the issued token plus its lifetime
/// and the profile of the customer it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub access_token: String,
    /// Token lifetime in seconds, relative to the moment of issue.
    pub expires_in_secs: i64,
    pub profile: UserProfile,
}
