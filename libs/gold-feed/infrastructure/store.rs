//! Durable key/value state with in-memory degradation.
//!
//! One JSON file per key under a state directory. Any filesystem
//! failure degrades the affected key to an in-process map: callers
//! never see storage errors, they just lose durability for the
//! session. Mirrors what a browser client does when localStorage is
//! blocked.

use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

pub struct StateStore {
    dir: Option<PathBuf>,
    memory: Mutex<HashMap<String, String>>,
}

impl StateStore {
    /// Opens a store rooted at `dir`, falling back to memory-only
    /// operation when the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        match fs::create_dir_all(&dir) {
            Ok(()) => {
                debug!("state store opened at {:?}", dir);
                Self {
                    dir: Some(dir),
                    memory: Mutex::new(HashMap::new()),
                }
            }
            Err(err) => {
                warn!(
                    "state dir {:?} unavailable ({}), falling back to memory",
                    dir, err
                );
                Self::in_memory()
            }
        }
    }

    /// Memory-only store, used in tests and as an explicit opt-out of
    /// persistence.
    pub fn in_memory() -> Self {
        Self {
            dir: None,
            memory: Mutex::new(HashMap::new()),
        }
    }

    fn memory(&self) -> MutexGuard<'_, HashMap<String, String>> {
        match self.memory.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn path_for(&self, key: &str) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| dir.join(format!("{key}.json")))
    }

    /// Raw string value for `key`, if any.
    pub fn get_raw(&self, key: &str) -> Option<String> {
        if let Some(path) = self.path_for(key) {
            match fs::read_to_string(&path) {
                Ok(content) => return Some(content),
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => {
                    warn!("failed to read {:?} ({}), trying memory", path, err);
                }
            }
        }
        self.memory().get(key).cloned()
    }

    /// Stores a raw string value. Never fails: a filesystem error keeps
    /// the value in memory instead.
    pub fn set_raw(&self, key: &str, value: &str) {
        if let Some(path) = self.path_for(key) {
            match fs::write(&path, value) {
                Ok(()) => {
                    // A durable write supersedes any degraded copy.
                    self.memory().remove(key);
                    return;
                }
                Err(err) => {
                    warn!(
                        "failed to write {:?} ({}), keeping value in memory",
                        path, err
                    );
                }
            }
        }
        self.memory().insert(key.to_string(), value.to_string());
    }

    /// Removes a key from both the directory and the memory fallback.
    pub fn remove(&self, key: &str) {
        if let Some(path) = self.path_for(key) {
            if let Err(err) = fs::remove_file(&path) {
                if err.kind() != ErrorKind::NotFound {
                    warn!("failed to remove {:?}: {}", path, err);
                }
            }
        }
        self.memory().remove(key);
    }

    /// Decoded JSON value for `key`. A corrupt entry is treated as
    /// missing, matching how a cache consumer wants to behave.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("failed to decode state for {}: {}", key, err);
                None
            }
        }
    }

    /// Stores a value as JSON, replacing any previous entry wholesale.
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(encoded) => self.set_raw(key, &encoded),
            Err(err) => warn!("failed to encode state for {}: {}", key, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        count: u32,
        label: String,
    }

    #[test]
    fn round_trips_json_values() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::open(dir.path());

        let value = Sample {
            count: 3,
            label: "gram".to_string(),
        };
        store.set_json("sample", &value);
        assert_eq!(store.get_json::<Sample>("sample"), Some(value));
    }

    #[test]
    fn values_survive_reopening() {
        let dir = TempDir::new().unwrap();
        {
            let store = StateStore::open(dir.path());
            store.set_raw("theme", "dark");
        }
        let store = StateStore::open(dir.path());
        assert_eq!(store.get_raw("theme"), Some("dark".to_string()));
    }

    #[test]
    fn memory_store_works_without_a_directory() {
        let store = StateStore::in_memory();
        store.set_raw("key", "value");
        assert_eq!(store.get_raw("key"), Some("value".to_string()));

        store.remove("key");
        assert_eq!(store.get_raw("key"), None);
    }

    #[test]
    fn unwritable_directory_degrades_to_memory() {
        // A path under a file cannot be created as a directory.
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a dir").unwrap();

        let store = StateStore::open(blocker.join("state"));
        store.set_raw("key", "value");
        assert_eq!(store.get_raw("key"), Some("value".to_string()));
    }

    #[test]
    fn corrupt_json_reads_as_missing() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::open(dir.path());

        store.set_raw("broken", "{not json");
        assert_eq!(store.get_json::<Sample>("broken"), None);
    }

    #[test]
    fn missing_key_is_none() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::open(dir.path());
        assert_eq!(store.get_raw("nope"), None);
    }
}
