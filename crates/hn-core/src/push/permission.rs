use serde::{Deserialize, Serialize};

/// Lowest Android API level that requires the runtime `POST_NOTIFICATIONS`
/// prompt. Below this level the permission is granted at install time.
pub const ANDROID_RUNTIME_PERMISSION_MIN_API: u32 = 33;

/// Outcome of a notification-permission request.
///
/// Denial is advisory: the app keeps running and the status is carried in
/// the bootstrap result so the interested screens can react.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Authorized,
    Denied,
    /// iOS quiet delivery: notifications arrive without prompting the user.
    Provisional,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Authorized | Self::Provisional)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provisional_counts_as_granted() {
        assert!(PermissionStatus::Authorized.is_granted());
        assert!(PermissionStatus::Provisional.is_granted());
        assert!(!PermissionStatus::Denied.is_granted());
    }

    #[test]
    fn serializes_lowercase_for_the_shell() {
        let json = serde_json::to_string(&PermissionStatus::Authorized).unwrap();
        assert_eq!(json, "\"authorized\"");
    }
}
