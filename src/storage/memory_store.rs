use std::collections::HashMap;

use anyhow::Result;
use tokio::sync::Mutex;

use crate::storage::KeyValueStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.inner.lock().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        self.inner.lock().await.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
