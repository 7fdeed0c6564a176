//! Settings store seam.
//!
//! The editor host owns the settings backend; this crate only reads named values from
//! it and, for `restore`, writes one back.

use crate::error::StoreError;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Grouped key/value settings owned by the host.
pub trait SettingsStore: Send + Sync {
    /// Raw value of `key` inside `namespace`, if set.
    fn get(&self, namespace: &str, key: &str) -> Option<Value>;

    /// Write a value back into the store.
    fn update(&self, namespace: &str, key: &str, value: Value) -> Result<(), StoreError>;
}

/// Typed read with fallback. Missing or malformed values yield `fallback`.
pub fn read_setting<T>(store: &dyn SettingsStore, namespace: &str, key: &str, fallback: T) -> T
where
    T: DeserializeOwned,
{
    match store.get(namespace, key) {
        None | Some(Value::Null) => fallback,
        Some(raw) => match serde_json::from_value::<T>(raw) {
            Ok(value) => value,
            Err(e) => {
                debug!(namespace, key, error = %e, "Malformed setting, using fallback");
                fallback
            }
        },
    }
}

/// In-memory settings keyed by `namespace.key`.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: RwLock<BTreeMap<String, Value>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for fixtures.
    pub fn with(self, namespace: &str, key: &str, value: impl Into<Value>) -> Self {
        self.set(namespace, key, value);
        self
    }

    pub fn set(&self, namespace: &str, key: &str, value: impl Into<Value>) {
        self.values
            .write()
            .insert(full_key(namespace, key), value.into());
    }

    pub fn remove(&self, namespace: &str, key: &str) -> Option<Value> {
        self.values.write().remove(&full_key(namespace, key))
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, namespace: &str, key: &str) -> Option<Value> {
        self.values.read().get(&full_key(namespace, key)).cloned()
    }

    fn update(&self, namespace: &str, key: &str, value: Value) -> Result<(), StoreError> {
        let mut values = self.values.write();
        if value.is_null() {
            values.remove(&full_key(namespace, key));
        } else {
            values.insert(full_key(namespace, key), value);
        }
        Ok(())
    }
}

fn full_key(namespace: &str, key: &str) -> String {
    format!("{}.{}", namespace, key)
}
