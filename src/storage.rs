use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, warn};

use crate::error::StoreError;

/// Raw key-value persistence. Values are JSON text.
pub trait StorageBackend: Send + Sync {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove_item(&self, key: &str) -> anyhow::Result<()>;
}

/// One `<key>.json` file per key inside `dir`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileStorage {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read {}", path.display())),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create data dir {}", self.dir.display()))?;
        let path = self.path_for(key);
        // write-then-rename so a crash never leaves a half-written value
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).with_context(|| format!("write {}", tmp.display()))?;
        std::fs::rename(&tmp, &path).with_context(|| format!("rename to {}", path.display()))?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove {}", path.display())),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a raw value, bypassing serialization.
    pub fn with_item(self, key: &str, raw: &str) -> Self {
        if let Ok(mut items) = self.items.lock() {
            items.insert(key.to_string(), raw.to_string());
        }
        self
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        let items = self
            .items
            .lock()
            .map_err(|_| anyhow::anyhow!("memory storage poisoned"))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut items = self
            .items
            .lock()
            .map_err(|_| anyhow::anyhow!("memory storage poisoned"))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        let mut items = self
            .items
            .lock()
            .map_err(|_| anyhow::anyhow!("memory storage poisoned"))?;
        items.remove(key);
        Ok(())
    }
}

/// A context with no durable backend at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStorage;

impl StorageBackend for UnavailableStorage {
    fn get_item(&self, _key: &str) -> anyhow::Result<Option<String>> {
        anyhow::bail!("durable storage is not available")
    }

    fn set_item(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
        anyhow::bail!("durable storage is not available")
    }

    fn remove_item(&self, _key: &str) -> anyhow::Result<()> {
        anyhow::bail!("durable storage is not available")
    }
}

/// Typed JSON access on top of a [`StorageBackend`].
///
/// `read` and `write` never fail past this boundary: errors are logged and
/// turned into "no prior value" or a dropped write.
#[derive(Clone)]
pub struct DurableStore {
    backend: Arc<dyn StorageBackend>,
}

impl DurableStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    pub fn try_read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let raw = self
            .backend
            .get_item(key)
            .map_err(|e| StoreError::StorageUnavailable(format!("{e:#}")))?;
        let Some(raw) = raw else {
            debug!(%key, "no stored value");
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StoreError::StorageCorrupt {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.try_read(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, %key, "failed to load stored value; using default");
                None
            }
        }
    }

    /// Returns whether the value reached the backend.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                error!(error = %e, %key, "failed to serialize value");
                return false;
            }
        };
        match self.backend.set_item(key, &raw) {
            Ok(()) => {
                debug!(%key, bytes = raw.len(), "value persisted");
                true
            }
            Err(e) => {
                error!(error = %e, %key, "failed to persist value");
                false
            }
        }
    }

    pub fn clear(&self, key: &str) {
        if let Err(e) = self.backend.remove_item(key) {
            warn!(error = %e, %key, "failed to remove stored value");
        }
    }
}
