//! File-backed key-value store.
//!
//! 文件型键值存储。
//!
//! A flat JSON object on disk holding the client's small persisted
//! namespace: session token, token expiry, onboarding flag, push token
//! cache. The desktop shell points it at the app data directory; the
//! mobile shells hand in their sandbox path.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

use hn_core::ports::{KeyValueStoreError, KeyValueStorePort};

pub const DEFAULT_STORE_FILE: &str = "homenet_store.json";

pub struct FileKeyValueStore {
    path: PathBuf,
    // Serializes read-modify-write cycles. Plain reads go straight to
    // the file; rename keeps them consistent.
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    /// Store backed by the given file path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// Store under a base directory with a custom filename.
    pub fn with_base_dir(base_dir: PathBuf, filename: impl Into<String>) -> Self {
        Self::new(base_dir.join(filename.into()))
    }

    /// Store under a base directory with the default filename.
    pub fn with_defaults(base_dir: PathBuf) -> Self {
        Self::new(base_dir.join(DEFAULT_STORE_FILE))
    }

    async fn ensure_parent_dir(&self) -> Result<(), KeyValueStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|err| KeyValueStoreError::Backend(err.to_string()))?;
        }
        Ok(())
    }

    async fn read_map(&self) -> Result<BTreeMap<String, String>, KeyValueStoreError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(KeyValueStoreError::Backend(err.to_string())),
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|err| KeyValueStoreError::Corrupt(err.to_string()))
    }

    /// Write through a temp file and rename, so the store on disk is
    /// either the old map or the new one, never a torn write.
    async fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), KeyValueStoreError> {
        self.ensure_parent_dir().await?;
        let json = serde_json::to_string_pretty(map)
            .map_err(|err| KeyValueStoreError::Backend(err.to_string()))?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .await
            .map_err(|err| KeyValueStoreError::Backend(err.to_string()))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|err| KeyValueStoreError::Backend(err.to_string()))
    }
}

#[async_trait]
impl KeyValueStorePort for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        Ok(self.read_map().await?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_map().await?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map).await
    }

    async fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_map().await?;
        if map.remove(key).is_none() {
            return Ok(());
        }
        self.write_map(&map).await
    }

    async fn clear(&self) -> Result<(), KeyValueStoreError> {
        let _guard = self.write_lock.lock().await;
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(KeyValueStoreError::Backend(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_get_returns_none_when_file_missing() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::with_defaults(temp_dir.path().to_path_buf());

        assert_eq!(store.get("access_token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::with_defaults(temp_dir.path().to_path_buf());

        store.set("access_token", "tok-1").await.unwrap();
        store.set("token_expiry", "170").await.unwrap();

        assert_eq!(
            store.get("access_token").await.unwrap().as_deref(),
            Some("tok-1")
        );
        assert_eq!(
            store.get("token_expiry").await.unwrap().as_deref(),
            Some("170")
        );
        assert!(temp_dir.path().join(DEFAULT_STORE_FILE).exists());
    }

    #[tokio::test]
    async fn test_set_overwrites_previous_value() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::with_defaults(temp_dir.path().to_path_buf());

        store.set("fcm_token", "old").await.unwrap();
        store.set("fcm_token", "new").await.unwrap();

        assert_eq!(store.get("fcm_token").await.unwrap().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_remove_deletes_only_that_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::with_defaults(temp_dir.path().to_path_buf());

        store.set("access_token", "tok-1").await.unwrap();
        store.set("onboarding_completed", "true").await.unwrap();
        store.remove("access_token").await.unwrap();
        // Removing an absent key is not an error.
        store.remove("access_token").await.unwrap();

        assert_eq!(store.get("access_token").await.unwrap(), None);
        assert_eq!(
            store.get("onboarding_completed").await.unwrap().as_deref(),
            Some("true")
        );
    }

    #[tokio::test]
    async fn test_clear_removes_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::with_defaults(temp_dir.path().to_path_buf());

        store.set("access_token", "tok-1").await.unwrap();
        store.clear().await.unwrap();
        store.clear().await.unwrap();

        assert_eq!(store.get("access_token").await.unwrap(), None);
        assert!(!temp_dir.path().join(DEFAULT_STORE_FILE).exists());
    }

    #[tokio::test]
    async fn test_empty_file_reads_as_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        fs::write(&path, "").await.unwrap();

        let store = FileKeyValueStore::new(path);
        assert_eq!(store.get("anything").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_file_surfaces_as_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        fs::write(&path, "{not json").await.unwrap();

        let store = FileKeyValueStore::new(path);
        let err = store.get("access_token").await.unwrap_err();
        assert!(matches!(err, KeyValueStoreError::Corrupt(_)));
    }

    #[tokio::test]
    async fn test_values_survive_reopening() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = FileKeyValueStore::with_defaults(temp_dir.path().to_path_buf());
            store.set("onboarding_completed", "true").await.unwrap();
        }

        let reopened = FileKeyValueStore::with_defaults(temp_dir.path().to_path_buf());
        assert_eq!(
            reopened
                .get("onboarding_completed")
                .await
                .unwrap()
                .as_deref(),
            Some("true")
        );
    }
}
