use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::storage::KeyValueStore;

/// Keys and values kept in one JSON object file.
///
/// A missing file reads as empty. Writes land in a sibling `.tmp` file first
/// and are renamed over the target, so a crash never leaves a half-written file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_raw(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(None),
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("read store {}", self.path.display())),
        }
    }

    async fn read_all(&self) -> Result<HashMap<String, String>> {
        match self.read_raw().await? {
            Some(content) => serde_json::from_str(&content)
                .with_context(|| format!("parse store {}", self.path.display())),
            None => Ok(HashMap::new()),
        }
    }

    /// Like `read_all`, but an unparsable file counts as empty so the next
    /// write replaces it instead of failing forever.
    async fn read_all_for_write(&self) -> Result<HashMap<String, String>> {
        let Some(content) = self.read_raw().await? else {
            return Ok(HashMap::new());
        };
        match serde_json::from_str(&content) {
            Ok(map) => Ok(map),
            Err(err) => {
                warn!("store {} is corrupt and will be overwritten: {}", self.path.display(), err);
                Ok(HashMap::new())
            }
        }
    }

    async fn write_all(&self, map: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, serde_json::to_vec_pretty(map)?)
            .await
            .with_context(|| format!("write store {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replace store {}", self.path.display()))?;
        debug!("store written to {}", self.path.display());
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_all_for_write().await?;
        map.insert(key.to_owned(), value.to_owned());
        self.write_all(&map).await
    }
}
