//! Local persistence for the license token.
//!
//! The consumer application detects entitlement by reading the same storage
//! under the same key, so the adapter is the only thing both sides share.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{Error, Result};

/// Storage adapter for the activation flow and the consuming application.
pub trait StorageAdapter: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &str) -> Option<String>;

    /// Set a value by key. Errors when the value could not actually be
    /// written; activation reports that distinctly from exchange failures.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value by key.
    fn remove(&self, key: &str);
}

/// In-memory storage adapter.
///
/// Useful for testing or ephemeral storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    store: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageAdapter for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.store.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut store = self
            .store
            .write()
            .map_err(|_| Error::Storage("storage lock poisoned".into()))?;
        store.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        if let Ok(mut store) = self.store.write() {
            store.remove(key);
        }
    }
}

/// File-based storage adapter.
///
/// Stores data in a JSON file in the app's data directory:
/// - Linux: `~/.local/share/{app_name}/licensing.json`
/// - macOS: `~/Library/Application Support/{app_name}/licensing.json`
/// - Windows: `C:\Users\{User}\AppData\Roaming\{app_name}\licensing.json`
#[cfg(feature = "native-storage")]
pub struct FileStorage {
    path: std::path::PathBuf,
    cache: RwLock<HashMap<String, String>>,
}

#[cfg(feature = "native-storage")]
impl FileStorage {
    /// Create a new file storage for the given app name.
    pub fn new(app_name: &str) -> Option<Self> {
        let dirs = directories::ProjectDirs::from("", "", app_name)?;
        let data_dir = dirs.data_dir();

        std::fs::create_dir_all(data_dir).ok()?;

        Self::at_path(data_dir.join("licensing.json"))
    }

    /// Create a file storage backed by an explicit file path.
    pub fn at_path(path: std::path::PathBuf) -> Option<Self> {
        let cache = if path.exists() {
            let contents = std::fs::read_to_string(&path).ok()?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            HashMap::new()
        };

        Some(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    fn save(&self) -> Result<()> {
        let cache = self
            .cache
            .read()
            .map_err(|_| Error::Storage("storage lock poisoned".into()))?;
        let contents = serde_json::to_string_pretty(&*cache)
            .map_err(|e| Error::Storage(format!("could not serialize storage: {}", e)))?;
        std::fs::write(&self.path, contents)
            .map_err(|e| Error::Storage(format!("could not write {}: {}", self.path.display(), e)))
    }
}

#[cfg(feature = "native-storage")]
impl StorageAdapter for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.cache.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        {
            let mut cache = self
                .cache
                .write()
                .map_err(|_| Error::Storage("storage lock poisoned".into()))?;
            cache.insert(key.to_string(), value.to_string());
        }
        self.save()
    }

    fn remove(&self, key: &str) {
        if let Ok(mut cache) = self.cache.write() {
            cache.remove(key);
        }
        let _ = self.save();
    }
}

#[cfg(feature = "native-storage")]
impl std::fmt::Debug for FileStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStorage")
            .field("path", &self.path)
            .finish()
    }
}
