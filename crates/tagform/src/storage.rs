//! Formula persistence
//!
//! The formula and cursor are stored as JSON under a fixed key in an
//! external key-value store, and restored verbatim:
//!
//! ```json
//! {"formula":[{"type":"tag","value":"name 1","id":"1"},{"type":"operator","value":"+"}],"cursorIndex":2}
//! ```

use crate::{Error, FormulaStore, Result, Token};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Key the formula snapshot is stored under
pub const STORAGE_KEY: &str = "formula-storage";

/// String key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: String) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-process storage
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Storage backed by a JSON object file
///
/// The file is read on every access and rewritten on every change. A
/// missing file reads as empty.
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

    fn load(&self) -> Result<HashMap<String, String>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => {
                return Err(Error::Storage(format!(
                    "Failed to read '{}': {}",
                    self.path.display(),
                    e
                )))
            }
        };
        if text.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&text).map_err(|e| {
            Error::Serialization(format!("Invalid store file '{}': {}", self.path.display(), e))
        })
    }

    fn write(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Storage(format!("Failed to create '{}': {}", parent.display(), e))
            })?;
        }
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| Error::Serialization(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| {
            Error::Storage(format!("Failed to write '{}': {}", self.path.display(), e))
        })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value);
        self.write(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.write(&entries)?;
        }
        Ok(())
    }
}

/// Persisted part of a [`FormulaStore`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormulaSnapshot {
    pub formula: Vec<Token>,
    #[serde(default)]
    pub cursor_index: usize,
}

impl FormulaSnapshot {
    pub fn capture(store: &FormulaStore) -> Self {
        Self {
            formula: store.formula().to_vec(),
            cursor_index: store.cursor_index(),
        }
    }

    pub fn into_store(self) -> FormulaStore {
        let mut store = FormulaStore::with_formula(self.formula);
        store.set_cursor_index(self.cursor_index);
        store
    }
}

/// Write the store's formula and cursor under [`STORAGE_KEY`]
pub fn save_formula<S: KeyValueStore + ?Sized>(kv: &mut S, store: &FormulaStore) -> Result<()> {
    let json = serde_json::to_string(&FormulaSnapshot::capture(store))
        .map_err(|e| Error::Serialization(e.to_string()))?;
    kv.set(STORAGE_KEY, json)?;
    tracing::debug!(tokens = store.len(), "formula saved");
    Ok(())
}

/// Rebuild a store from [`STORAGE_KEY`], or `None` if nothing was saved
pub fn restore_formula<S: KeyValueStore + ?Sized>(kv: &S) -> Result<Option<FormulaStore>> {
    let Some(json) = kv.get(STORAGE_KEY)? else {
        return Ok(None);
    };
    let snapshot: FormulaSnapshot = serde_json::from_str(&json)
        .map_err(|e| Error::Serialization(format!("Invalid formula snapshot: {}", e)))?;
    tracing::debug!(tokens = snapshot.formula.len(), "formula restored");
    Ok(Some(snapshot.into_store()))
}
