use serde::{Deserialize, Serialize};

use crate::auth::UserProfile;
use crate::push::PermissionStatus;

/// Outcome of a cold-start bootstrap run.
///
/// 冷启动引导的最终结果。
///
/// Navigation keys off this value: logged-in customers land on the home
/// screen, everyone else goes through onboarding or authentication. A
/// bootstrap run always produces exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppBootstrapResult {
    pub logged_in: bool,
    pub has_completed_onboarding: bool,
    /// Present exactly when `logged_in` is true.
    #[serde(default)]
    pub user_profile: Option<UserProfile>,
    pub notification_permission: PermissionStatus,
}

impl AppBootstrapResult {
    /// A logged-in customer has implicitly completed onboarding.
    pub fn logged_in(profile: UserProfile, permission: PermissionStatus) -> Self {
        Self {
            logged_in: true,
            has_completed_onboarding: true,
            user_profile: Some(profile),
            notification_permission: permission,
        }
    }

    pub fn logged_out(has_completed_onboarding: bool, permission: PermissionStatus) -> Self {
        Self {
            logged_in: false,
            has_completed_onboarding,
            user_profile: None,
            notification_permission: permission,
        }
    }
}
