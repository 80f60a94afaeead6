//! In-memory key-value store, for tests and previews.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use hn_core::ports::{KeyValueStoreError, KeyValueStorePort};

/// A [`KeyValueStorePort`] over a plain map. Never fails.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStorePort for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), KeyValueStoreError> {
        self.values.lock().unwrap().clear();
        Ok(())
    }
}
