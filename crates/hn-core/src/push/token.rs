use serde::{Deserialize, Serialize};

/// Device push token issued by the messaging provider.
///
/// 消息推送服务下发的设备令牌。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushToken {
    pub value: String,
    /// Whether this exact value has been registered with the backend.
    /// Rotated tokens start out unregistered.
    pub registered_with_backend: bool,
}

impl PushToken {
    pub fn unregistered(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            registered_with_backend: false,
        }
    }

    pub fn mark_registered(&mut self) {
        self.registered_with_backend = true;
    }
}
