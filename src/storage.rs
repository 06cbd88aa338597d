//! Device-local key/value storage
//!
//! This module provides:
//! - A `KeyValueStore` capability shared by the session pointer and the local backend
//! - `DeviceStore`: files under the platform data dir on native, `localStorage` on wasm
//! - `MemoryStore`: process-local storage for tests and sandboxed webviews

use std::collections::HashMap;
use std::sync::Mutex;

#[cfg(not(target_arch = "wasm32"))]
use std::{fs, io, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage read failed for '{key}': {message}")]
    Read { key: String, message: String },

    #[error("storage write failed for '{key}': {message}")]
    Write { key: String, message: String },
}

/// Synchronous string key/value store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// ============================================
// In-memory store
// ============================================

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

// ============================================
// Device store (native: one file per key)
// ============================================

#[cfg(not(target_arch = "wasm32"))]
pub struct DeviceStore {
    root: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl DeviceStore {
    /// Store rooted at `<data_local_dir>/smepro/<namespace>`.
    pub fn open(namespace: &str) -> Self {
        let safe = sanitize_key(namespace);
        let root = match dirs::data_local_dir() {
            Some(data_dir) => data_dir.join("smepro").join(safe),
            None => PathBuf::from("cache").join("smepro").join(safe),
        };
        Self { root }
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_key(key)))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for DeviceStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let write_err = |e: io::Error| StorageError::Write {
            key: key.to_string(),
            message: e.to_string(),
        };
        fs::create_dir_all(&self.root).map_err(write_err)?;
        fs::write(self.path_for(key), value).map_err(write_err)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Write {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

// ============================================
// Device store (wasm: window.localStorage)
// ============================================

#[cfg(target_arch = "wasm32")]
pub struct DeviceStore {
    prefix: String,
}

#[cfg(target_arch = "wasm32")]
impl DeviceStore {
    pub fn open(namespace: &str) -> Self {
        Self {
            prefix: format!("{}.", sanitize_key(namespace)),
        }
    }

    fn local_storage() -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("window is unavailable".into()))?;
        window
            .local_storage()
            .map_err(|_| StorageError::Unavailable("failed to access local storage".into()))?
            .ok_or_else(|| StorageError::Unavailable("local storage is unavailable".into()))
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

// web_sys handles are not Send; the store only ever runs on the browser main thread.
#[cfg(target_arch = "wasm32")]
unsafe impl Send for DeviceStore {}
#[cfg(target_arch = "wasm32")]
unsafe impl Sync for DeviceStore {}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for DeviceStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::local_storage()?
            .get_item(&self.scoped(key))
            .map_err(|_| StorageError::Read {
                key: key.to_string(),
                message: "getItem rejected".into(),
            })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::local_storage()?
            .set_item(&self.scoped(key), value)
            .map_err(|_| StorageError::Write {
                key: key.to_string(),
                message: "setItem rejected".into(),
            })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Self::local_storage()?
            .remove_item(&self.scoped(key))
            .map_err(|_| StorageError::Write {
                key: key.to_string(),
                message: "removeItem rejected".into(),
            })
    }
}

/// Sanitize storage key for filesystem use
pub(crate) fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(64)
        .collect()
}
