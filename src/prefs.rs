//! Profile-scoped preference storage
//!
//! The savings tracker reads and writes two preferences: a cumulative byte
//! counter and the day-bucketed history. Writes are fire-and-forget; a failed
//! write is logged and otherwise ignored.

use crate::error::PrefStoreError;
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Cumulative predicted bytes saved, across all time
pub const BANDWIDTH_SAVED_BYTES: &str = "savings.bandwidth_saved_bytes";

/// Day-bucketed savings history, newest first
pub const BANDWIDTH_SAVED_DAILY_BYTES: &str = "savings.bandwidth_saved_daily_bytes";

/// Key-value preference collaborator
pub trait PrefStore {
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&mut self, key: &str, value: Value);

    fn get_u64(&self, key: &str) -> u64 {
        self.get(key).and_then(|v| v.as_u64()).unwrap_or(0)
    }

    fn set_u64(&mut self, key: &str, value: u64) {
        self.set(key, Value::from(value));
    }
}

/// Preference store shared by every tab of one profile
pub type SharedPrefStore = Rc<RefCell<dyn PrefStore>>;

/// In-memory preference store
#[derive(Debug, Clone, Default)]
pub struct MemoryPrefStore {
    values: Map<String, Value>,
}

impl MemoryPrefStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_shared(self) -> SharedPrefStore {
        Rc::new(RefCell::new(self))
    }
}

impl PrefStore for MemoryPrefStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }
}

/// Preference store persisted as one JSON object on disk
///
/// A missing file starts empty. A malformed file is logged and treated as
/// empty; it is overwritten by the next write.
#[derive(Debug)]
pub struct JsonFilePrefStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl JsonFilePrefStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match Self::read(&path) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!("Ignoring preference file {}: {}", path.display(), e);
                Map::new()
            }
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_shared(self) -> SharedPrefStore {
        Rc::new(RefCell::new(self))
    }

    fn read(path: &Path) -> Result<Map<String, Value>, PrefStoreError> {
        if !path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(path)?;
        match serde_json::from_str(&content)? {
            Value::Object(values) => Ok(values),
            _ => Ok(Map::new()),
        }
    }

    /// Write all values through a temporary file and rename
    pub fn commit(&self) -> Result<(), PrefStoreError> {
        let serialized = serde_json::to_string_pretty(&self.values)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, serialized)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl PrefStore for JsonFilePrefStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
        if let Err(e) = self.commit() {
            tracing::warn!(
                "Failed to persist preference {} to {}: {}",
                key,
                self.path.display(),
                e
            );
        }
    }
}
