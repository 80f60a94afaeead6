//! Durable key-value storage port
//!
//! This port defines the contract for the small persisted namespace the
//! client keeps on device: session token, expiry, onboarding flag and the
//! push token cache. Implementations are provided by the infrastructure
//! layer (e.g., file-based storage).

use async_trait::async_trait;

/// All operations are asynchronous and callers must await completion
/// before acting on the outcome. Writes that have not resolved yet are
/// not guaranteed to be visible to subsequent reads.
///
/// 所有操作均为异步，调用方必须等待完成后再做决定。
#[async_trait]
pub trait KeyValueStorePort: Send + Sync {
    /// Read a value. `Ok(None)` means the key was never written.
    async fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError>;

    /// Remove a key. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), KeyValueStoreError>;

    /// Remove every key in the namespace.
    async fn clear(&self) -> Result<(), KeyValueStoreError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum KeyValueStoreError {
    #[error("storage backend failed: {0}")]
    Backend(String),

    #[error("stored data is corrupt: {0}")]
    Corrupt(String),
}

#[cfg(test)]
mockall::mock! {
    pub KeyValueStore {}

    #[async_trait]
    impl KeyValueStorePort for KeyValueStore {
        async fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError>;
        async fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError>;
        async fn remove(&self, key: &str) -> Result<(), KeyValueStoreError>;
        async fn clear(&self) -> Result<(), KeyValueStoreError>;
    }
}
