//! Configuration service: owns the published snapshot.
//!
//! Snapshots are immutable `Arc<Config>` values swapped under a single write lock, so a
//! reader sees either the previous or the next snapshot in full. Subscribers are told
//! about every swap, in registration order, after the lock is released.

use crate::config::build::resolve_namespaces;
use crate::config::constants::LOCAL_CONFIG_KEY;
use crate::config::local_store::{LocalStore, LocalStoreExt};
use crate::config::merge::merge_policy;
use crate::config::settings_store::SettingsStore;
use crate::config::{ChangeEvent, Config};
use crate::error::ApiError;
use crate::observer::{Observable, SubscriptionId};
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

pub struct ConfigService {
    settings: Arc<dyn SettingsStore>,
    local: Arc<dyn LocalStore>,
    state: RwLock<Option<Arc<Config>>>,
    changes: Observable<Config>,
}

impl ConfigService {
    /// Create the service and publish the first snapshot.
    pub fn new(settings: Arc<dyn SettingsStore>, local: Arc<dyn LocalStore>) -> Self {
        let service = Self::unloaded(settings, local);
        service.reload(None);
        service
    }

    /// Create the service without publishing a snapshot. Every snapshot accessor fails
    /// with [`ApiError::NotConfigured`] until [`reload`](Self::reload) runs.
    pub fn unloaded(settings: Arc<dyn SettingsStore>, local: Arc<dyn LocalStore>) -> Self {
        Self {
            settings,
            local,
            state: RwLock::new(None),
            changes: Observable::new(),
        }
    }

    pub fn settings(&self) -> &Arc<dyn SettingsStore> {
        &self.settings
    }

    pub fn local_store(&self) -> &Arc<dyn LocalStore> {
        &self.local
    }

    /// Rebuild the snapshot from the settings store and local overrides, publish it and
    /// notify subscribers.
    pub fn reload(&self, event: Option<ChangeEvent>) -> Arc<Config> {
        let origin = event.as_ref().map(|e| e.origin.clone());
        let (snapshot, override_count) = {
            // A concurrent set_local lands either in this snapshot or on top of it.
            let mut state = self.state.write();
            let resolved = resolve_namespaces(self.settings.as_ref(), event);
            let overrides = self.local_overrides();
            let snapshot = Arc::new(merge_policy::overlay(resolved, &overrides));
            *state = Some(Arc::clone(&snapshot));
            (snapshot, overrides.len())
        };
        info!(
            origin = origin.as_deref().unwrap_or("initial"),
            overrides = override_count,
            "Configuration reloaded"
        );

        self.changes.notify(Arc::clone(&snapshot));
        snapshot
    }

    /// Current snapshot.
    pub fn get_state(&self) -> Result<Arc<Config>, ApiError> {
        self.state.read().clone().ok_or(ApiError::NotConfigured)
    }

    /// Override one field for this workspace.
    ///
    /// Only the named field changes; derived fields are not recomputed until the next
    /// [`reload`](Self::reload). The override is persisted in the local store and wins
    /// over namespace values on every later reload.
    pub fn set_local(&self, key: &str, value: impl Into<Value>) -> Result<(), ApiError> {
        let value = value.into();
        let snapshot = {
            let mut state = self.state.write();
            let current = state.as_ref().ok_or(ApiError::NotConfigured)?;
            let next = Arc::new(merge_policy::apply_override(current, key, value.clone())?);

            let mut overrides = self.local_overrides();
            overrides.insert(key.to_string(), value);
            self.local
                .set_value(LOCAL_CONFIG_KEY, Value::Object(overrides))?;

            *state = Some(Arc::clone(&next));
            next
        };

        debug!(key, "Local override applied");
        self.changes.notify(snapshot);
        Ok(())
    }

    /// Drop a local override. Takes effect on the next reload, which this triggers.
    pub fn clear_local(&self, key: &str) -> Result<Arc<Config>, ApiError> {
        {
            let _state = self.state.write();
            let mut overrides = self.local_overrides();
            if overrides.remove(key).is_some() {
                self.local
                    .set_value(LOCAL_CONFIG_KEY, Value::Object(overrides))?;
            }
        }
        Ok(self.reload(Some(ChangeEvent::new(format!("clear_local:{}", key)))))
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Arc<Config>) + Send + Sync + 'static,
    {
        self.changes.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.changes.unsubscribe(id)
    }

    /// Transient boolean flag, false when unset.
    pub fn get_flag(&self, key: &str) -> bool {
        self.local.get_or(key, false)
    }

    pub fn set_flag(&self, key: &str) -> Result<(), ApiError> {
        Ok(self.local.set_value(key, Value::Bool(true))?)
    }

    pub fn clear_flag(&self, key: &str) -> Result<(), ApiError> {
        Ok(self.local.set_value(key, Value::Bool(false))?)
    }

    /// Copy a raw setting into the local store under `namespace.key` and return it.
    pub fn backup(&self, namespace: &str, key: &str) -> Result<Option<Value>, ApiError> {
        let value = self.settings.get(namespace, key);
        self.local.set_value(
            &backup_key(namespace, key),
            value.clone().unwrap_or(Value::Null),
        )?;
        debug!(namespace, key, present = value.is_some(), "Setting backed up");
        Ok(value)
    }

    /// Write a backed-up value back into the settings store. Returns false when nothing
    /// was stored. `0`, `""` and `false` count as stored values.
    pub fn restore(&self, namespace: &str, key: &str) -> Result<bool, ApiError> {
        match self.local.get_value(&backup_key(namespace, key)) {
            None | Some(Value::Null) => Ok(false),
            Some(stored) => {
                self.settings.update(namespace, key, stored)?;
                debug!(namespace, key, "Setting restored");
                Ok(true)
            }
        }
    }

    fn local_overrides(&self) -> Map<String, Value> {
        self.local.get_or(LOCAL_CONFIG_KEY, Map::new())
    }
}

fn backup_key(namespace: &str, key: &str) -> String {
    format!("{}.{}", namespace, key)
}
