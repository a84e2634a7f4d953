//! Key-value persistence port
//!
//! The session and the bookmark store persist a handful of small values
//! (id sets, an integer preference). They go through this port so the
//! orchestration logic can be tested against an in-memory fake. Writes are
//! synchronous and cheap; a failed write is logged and otherwise ignored,
//! stale persisted state being acceptable.

use std::collections::HashMap;
use std::path::PathBuf;

use parking_lot::RwLock;
use tracing::warn;

/// Synchronous key-value persistence
pub trait KeyValueStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Option<String>;
    /// Write a value
    fn set(&self, key: &str, value: &str);
}

/// In-memory store, used in tests and as a null persistence layer
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values.write().insert(key.to_string(), value.to_string());
    }
}

/// File-backed store holding all values in one JSON object
///
/// The file is read once at open and rewritten on every set.
pub struct JsonFileStore {
    path: PathBuf,
    values: RwLock<HashMap<String, String>>,
}

impl JsonFileStore {
    /// Open a store at the given path, loading any existing contents
    ///
    /// A missing or unreadable file starts the store empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!("ignoring corrupt state file {}: {err}", path.display());
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };
        Self {
            path,
            values: RwLock::new(values),
        }
    }

    fn flush(&self, values: &HashMap<String, String>) {
        let json = match serde_json::to_string_pretty(values) {
            Ok(json) => json,
            Err(err) => {
                warn!("failed to serialize state: {err}");
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(err) = std::fs::write(&self.path, json) {
            warn!("failed to persist state to {}: {err}", self.path.display());
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = self.values.write();
        values.insert(key.to_string(), value.to_string());
        self.flush(&values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("missing"), None);
        store.set("quantity", "4");
        assert_eq!(store.get("quantity").as_deref(), Some("4"));
        store.set("quantity", "5");
        assert_eq!(store.get("quantity").as_deref(), Some("5"));
    }

    #[test]
    fn test_json_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        {
            let store = JsonFileStore::open(&path);
            store.set("shown_ids", r#"["a","b"]"#);
            store.set("quantity", "3");
        }

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get("shown_ids").as_deref(), Some(r#"["a","b"]"#));
        assert_eq!(reopened.get("quantity").as_deref(), Some("3"));
    }

    #[test]
    fn test_json_file_store_ignores_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::open(&path);
        assert_eq!(store.get("anything"), None);
        store.set("k", "v");
        assert_eq!(store.get("k").as_deref(), Some("v"));
    }
}
