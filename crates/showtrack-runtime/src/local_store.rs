//! Device-local key/value storage for values that outlive a process, such
//! as the signed-in identity.
//!
//! Each key is a small JSON file under a data directory. An in-memory
//! backend exists for tests and ephemeral sessions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use showtrack_core::error::ShowtrackError;

/// Key holding the signed-in identity.
pub const AUTH_USER_KEY: &str = "auth-user";

/// Keys left behind by older builds that mirrored lists locally. Only
/// cleared, never read.
pub const LEGACY_LIST_KEYS: &[&str] = &["user-favorites", "user-watchlist", "user-watched"];

pub struct LocalStore {
    backend: Backend,
}

enum Backend {
    Dir(PathBuf),
    Memory(Mutex<HashMap<String, String>>),
}

impl LocalStore {
    pub fn open(dir: &Path) -> Result<Self, ShowtrackError> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            backend: Backend::Dir(dir.to_path_buf()),
        })
    }

    pub fn memory() -> Self {
        Self {
            backend: Backend::Memory(Mutex::new(HashMap::new())),
        }
    }

    /// Read and decode a value. A value that can't be decoded is removed.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding unreadable local value");
                self.remove(key);
                None
            }
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ShowtrackError> {
        let json = serde_json::to_string_pretty(value)?;
        match &self.backend {
            Backend::Dir(dir) => std::fs::write(dir.join(file_name(key)), json)?,
            Backend::Memory(map) => {
                if let Ok(mut map) = map.lock() {
                    map.insert(key.to_string(), json);
                }
            }
        }
        Ok(())
    }

    /// Remove a value. Missing keys are ignored; errors are logged.
    pub fn remove(&self, key: &str) {
        match &self.backend {
            Backend::Dir(dir) => {
                let path = dir.join(file_name(key));
                if let Err(e) = std::fs::remove_file(&path) {
                    if e.kind() != std::io::ErrorKind::NotFound {
                        tracing::warn!(key, "Failed to remove local value: {e}");
                    }
                }
            }
            Backend::Memory(map) => {
                if let Ok(mut map) = map.lock() {
                    map.remove(key);
                }
            }
        }
    }

    /// Drop the saved identity and any legacy list mirrors.
    pub fn clear_session(&self) {
        self.remove(AUTH_USER_KEY);
        for key in LEGACY_LIST_KEYS {
            self.remove(key);
        }
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match &self.backend {
            Backend::Dir(dir) => std::fs::read_to_string(dir.join(file_name(key))).ok(),
            Backend::Memory(map) => map.lock().ok()?.get(key).cloned(),
        }
    }
}

fn file_name(key: &str) -> String {
    format!("{key}.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        store.set("k", &vec![1, 2, 3]).unwrap();
        assert_eq!(store.get::<Vec<i32>>("k"), Some(vec![1, 2, 3]));

        let reopened = LocalStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get::<Vec<i32>>("k"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_corrupt_value_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("auth-user.json"), "{not json").unwrap();
        let store = LocalStore::open(dir.path()).unwrap();

        assert!(store.get::<serde_json::Value>(AUTH_USER_KEY).is_none());
        assert!(!dir.path().join("auth-user.json").exists());
    }

    #[test]
    fn test_clear_session_removes_legacy_keys() {
        let store = LocalStore::memory();
        store.set(AUTH_USER_KEY, &"me").unwrap();
        store.set("user-watched", &Vec::<u64>::new()).unwrap();
        store.set("unrelated", &true).unwrap();

        store.clear_session();
        assert!(store.get::<String>(AUTH_USER_KEY).is_none());
        assert!(store.get::<Vec<u64>>("user-watched").is_none());
        assert_eq!(store.get::<bool>("unrelated"), Some(true));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        store.remove("nothing");
    }
}
