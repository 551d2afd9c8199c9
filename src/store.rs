//! Best-effort key-value snapshot cache.
//!
//! A thin, forgiving store for UI state that is nice to keep across
//! sessions but never worth an error: every read or write failure is
//! swallowed to a debug diagnostic and the feature degrades to cache-miss
//! behavior. Values are JSON, fronted by an in-memory cache and persisted
//! to a single file when a path is configured.

use std::{
    collections::HashMap,
    fs,
    path::PathBuf,
    sync::Mutex,
};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

pub struct Store {
    path: Option<PathBuf>,
    cache: Mutex<HashMap<String, Value>>,
}

impl Store {
    /// Opens the store, loading whatever the cache file holds. A missing
    /// or unreadable file simply starts empty.
    #[must_use]
    pub fn open(path: Option<PathBuf>) -> Self {
        let mut cache = HashMap::new();

        if let Some(path) = &path {
            match fs::read(path) {
                Ok(bytes) => match serde_json::from_slice(&bytes) {
                    Ok(loaded) => cache = loaded,
                    Err(e) => debug!("snapshot cache unreadable: {e}"),
                },
                Err(e) => debug!("snapshot cache not loaded: {e}"),
            }
        }

        Self {
            path,
            cache: Mutex::new(cache),
        }
    }

    /// Stores a key value pair, persisting best-effort.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                debug!("snapshot value not encodable: {e}");
                return;
            }
        };

        let Ok(mut cache) = self.cache.lock() else {
            debug!("snapshot cache poisoned");
            return;
        };
        cache.insert(key.to_owned(), value);

        if let Some(path) = &self.path {
            let result = serde_json::to_vec_pretty(&*cache)
                .map_err(std::io::Error::other)
                .and_then(|bytes| fs::write(path, bytes));
            if let Err(e) = result {
                debug!("snapshot cache not written: {e}");
            }
        }
    }

    /// Returns the value for a key, or `None` on any kind of miss.
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let cache = self.cache.lock().ok()?;
        let value = cache.get(key)?;

        match serde_json::from_value(value.clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("snapshot value for `{key}` unreadable: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn round_trips_through_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");

        let store = Store::open(Some(path.clone()));
        let mut folders = HashMap::new();
        folders.insert("albums/2024".to_owned(), true);
        store.set("db.active", &folders);

        let reopened = Store::open(Some(path));
        let loaded: HashMap<String, bool> = reopened.get("db.active").unwrap();
        assert_eq!(loaded, folders);
    }

    #[test]
    fn misses_yield_none() {
        let store = Store::open(None);
        assert_eq!(store.get::<bool>("absent"), None);
    }

    #[test]
    fn unwritable_path_degrades_silently() {
        let store = Store::open(Some(PathBuf::from("/nonexistent/dir/snapshot.json")));
        store.set("key", &1_u32);
        // The write failed, but the in-memory cache still serves.
        assert_eq!(store.get::<u32>("key"), Some(1));
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        fs::write(&path, b"not json").unwrap();

        let store = Store::open(Some(path));
        assert_eq!(store.get::<bool>("db.active"), None);
    }
}
