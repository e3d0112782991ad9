//! Key-value persistence for settings and high scores
//!
//! Backends:
//! - `MemoryStore`: in-process map (tests, headless runs)
//! - `FileStore`: one JSON file per key in a directory (native)
//! - `LocalStore`: browser LocalStorage (wasm32)
//!
//! Values are opaque strings; callers own the encoding.

use std::collections::HashMap;

use thiserror::Error;

/// Failures surfaced by a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode value: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// String key-value store
pub trait KeyValueStore {
    /// Read a value; `Ok(None)` when the key has never been written
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Write a value, replacing any previous one
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::PathBuf;

    use super::{KeyValueStore, StorageError};

    /// Directory of `<key>.json` files
    #[derive(Debug, Clone)]
    pub struct FileStore {
        dir: PathBuf,
    }

    impl FileStore {
        pub fn new(dir: impl Into<PathBuf>) -> Self {
            Self { dir: dir.into() }
        }

        /// Store under the platform's local data directory
        pub fn in_data_dir(app: &str) -> Result<Self, StorageError> {
            dirs::data_local_dir()
                .map(|dir| Self::new(dir.join(app)))
                .ok_or_else(|| StorageError::Unavailable("no local data directory".to_string()))
        }

        fn path_for(&self, key: &str) -> PathBuf {
            self.dir.join(format!("{key}.json"))
        }
    }

    impl KeyValueStore for FileStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            match fs::read_to_string(self.path_for(key)) {
                Ok(contents) => Ok(Some(contents)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            fs::create_dir_all(&self.dir)?;
            // Replace atomically via a temp file
            let tmp = self.dir.join(format!("{key}.json.tmp"));
            fs::write(&tmp, value)?;
            fs::rename(&tmp, self.path_for(key))?;
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;

#[cfg(target_arch = "wasm32")]
mod local {
    use super::{KeyValueStore, StorageError};

    /// Browser LocalStorage
    #[derive(Debug, Clone, Default)]
    pub struct LocalStore;

    impl LocalStore {
        fn storage() -> Result<web_sys::Storage, StorageError> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
                .ok_or_else(|| StorageError::Unavailable("LocalStorage".to_string()))
        }
    }

    impl KeyValueStore for LocalStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Self::storage()?
                .get_item(key)
                .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            Self::storage()?
                .set_item(key, value)
                .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert!(store.get("a").unwrap().is_none());
        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_store() {
        let dir = std::env::temp_dir().join(format!("bubble_pop_store_{}", std::process::id()));
        let mut store = FileStore::new(&dir);
        assert!(store.get("scores").unwrap().is_none());
        store.set("scores", "[]").unwrap();
        assert_eq!(store.get("scores").unwrap().as_deref(), Some("[]"));

        // A second handle on the same directory sees the value
        let reopened = FileStore::new(&dir);
        assert_eq!(reopened.get("scores").unwrap().as_deref(), Some("[]"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
