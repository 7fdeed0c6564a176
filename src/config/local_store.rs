//! Per-workspace local override store.
//!
//! Holds the `config` override map, transient UI flags and `backup` copies of settings.
//! Writing `null` removes a key.

use crate::error::StoreError;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Workspace-scoped key/value storage.
pub trait LocalStore: Send + Sync {
    fn get_value(&self, key: &str) -> Option<Value>;

    fn set_value(&self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// Typed helpers over any [`LocalStore`].
pub trait LocalStoreExt: LocalStore {
    /// Typed read; missing or mistyped values yield `fallback`.
    fn get_or<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        match self.get_value(key) {
            None | Some(Value::Null) => fallback,
            Some(raw) => serde_json::from_value(raw).unwrap_or_else(|e| {
                debug!(key, error = %e, "Mistyped local value, using fallback");
                fallback
            }),
        }
    }

    fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        self.set_value(key, serde_json::to_value(value)?)
    }
}

impl<S: LocalStore + ?Sized> LocalStoreExt for S {}

/// Volatile store, used for tests and hosts without a workspace.
#[derive(Debug, Default)]
pub struct MemoryLocalStore {
    values: RwLock<Map<String, Value>>,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryLocalStore {
    fn get_value(&self, key: &str) -> Option<Value> {
        self.values.read().get(key).cloned()
    }

    fn set_value(&self, key: &str, value: Value) -> Result<(), StoreError> {
        apply(&mut self.values.write(), key, value);
        Ok(())
    }
}

/// Store persisted as one JSON object, rewritten on every change.
#[derive(Debug)]
pub struct JsonFileLocalStore {
    path: PathBuf,
    values: RwLock<Map<String, Value>>,
}

impl JsonFileLocalStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let values = if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            if raw.trim().is_empty() {
                Map::new()
            } else {
                match serde_json::from_str::<Value>(&raw)? {
                    Value::Object(map) => map,
                    other => {
                        return Err(StoreError::Malformed {
                            path: path.display().to_string(),
                            reason: format!("expected a JSON object, found {}", kind_name(&other)),
                        })
                    }
                }
            }
        } else {
            Map::new()
        };

        debug!(path = %path.display(), keys = values.len(), "Local store opened");
        Ok(Self {
            path: path.to_path_buf(),
            values: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = serde_json::to_string_pretty(values)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serialized)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl LocalStore for JsonFileLocalStore {
    fn get_value(&self, key: &str) -> Option<Value> {
        self.values.read().get(key).cloned()
    }

    fn set_value(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut values = self.values.write();
        apply(&mut values, key, value);
        self.persist(&values)?;
        info!(key, path = %self.path.display(), "Local value persisted");
        Ok(())
    }
}

fn apply(values: &mut Map<String, Value>, key: &str, value: Value) {
    if value.is_null() {
        values.remove(key);
    } else {
        values.insert(key.to_string(), value);
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
