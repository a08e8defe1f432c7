//! Persistent key-value capability and the configuration record layout on top of it.

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;

pub mod config_store;
pub mod file_store;
pub mod memory_store;

pub use config_store::ConfigStore;
pub use file_store::FileStore;
pub use memory_store::MemoryStore;

/// Flat string-keyed store.
pub trait KeyValueStore: Send + Sync {
    fn load(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    fn save(&self, key: &str, value: &str) -> impl Future<Output = Result<()>> + Send;
}

impl<S: KeyValueStore> KeyValueStore for Arc<S> {
    fn load(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> impl Future<Output = Result<()>> + Send {
        (**self).save(key, value)
    }
}
