//! Persistent key-value storage for settings, history and undo snapshots.
//!
//! The engine never touches storage. The session reads settings once at
//! start and writes through the typed helpers in [`settings`], [`history`]
//! and [`undo`], each of which owns one key.

pub mod history;
pub mod settings;
pub mod undo;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{PriceError, PriceResult};
use crate::util::atomic::atomic_write;

pub use history::HistoryEntry;
pub use settings::Settings;
pub use undo::UndoSnapshot;

/// Minimal get/set/list/clear store of JSON values.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> PriceResult<Option<Value>>;
    fn set(&mut self, key: &str, value: Value) -> PriceResult<()>;
    fn list(&self) -> PriceResult<Vec<String>>;
    fn clear(&mut self, key: &str) -> PriceResult<()>;
}

/// Read `key` and deserialize it, `None` when absent.
pub fn load<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> PriceResult<Option<T>> {
    store
        .get(key)?
        .map(serde_json::from_value)
        .transpose()
        .map_err(PriceError::from)
}

/// Serialize `value` and write it under `key`.
pub fn save<T: Serialize>(store: &mut dyn KeyValueStore, key: &str, value: &T) -> PriceResult<()> {
    store.set(key, serde_json::to_value(value)?)
}

/// Store kept in process memory only.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> PriceResult<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> PriceResult<()> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }

    fn list(&self) -> PriceResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn clear(&mut self, key: &str) -> PriceResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store persisted as one pretty-printed JSON object on disk.
///
/// Every write rewrites the file atomically. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> PriceResult<BTreeMap<String, Value>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(source) => Err(PriceError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, Value>) -> PriceResult<()> {
        let text = serde_json::to_string_pretty(entries)?;
        atomic_write(&self.path, &text).map_err(|source| PriceError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), keys = entries.len(), "store written");
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> PriceResult<Option<Value>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: Value) -> PriceResult<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_owned(), value);
        self.write_all(&entries)
    }

    fn list(&self) -> PriceResult<Vec<String>> {
        Ok(self.read_all()?.into_keys().collect())
    }

    fn clear(&mut self, key: &str) -> PriceResult<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}
