//! File-backed settings store.
//!
//! Layers (lowest to highest): global settings file, then workspace settings file.
//! Namespaces address TOML tables, so `markdown-fiction-writer.view` +
//! `writingMode.enabled` reads
//!
//! ```toml
//! [markdown-fiction-writer.view]
//! writingMode.enabled = true
//! ```
//!
//! Values are read from the parsed TOML documents so table keys keep their case. The
//! `config` crate layering is used for the `[logging]` table. Writes go to the workspace
//! file.

use crate::config::settings_store::SettingsStore;
use crate::config::sources::{global_file, workspace_file};
use crate::error::StoreError;
use crate::logging::LoggingConfig;
use config::Config as Layered;
use parking_lot::RwLock;
use serde_json::Value;
use std::path::{Path, PathBuf};
use toml::{Table, Value as TomlValue};
use tracing::{debug, info};

pub struct FileSettings {
    workspace_root: PathBuf,
    layered: RwLock<Layered>,
    /// Parsed settings documents, lowest precedence first
    documents: RwLock<Vec<Table>>,
}

impl FileSettings {
    /// Load settings for the given workspace.
    pub fn load(workspace_root: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            workspace_root: workspace_root.to_path_buf(),
            layered: RwLock::new(build_layered(workspace_root)?),
            documents: RwLock::new(read_documents(workspace_root)?),
        })
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Files that feed this store, whether or not they exist yet.
    pub fn source_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(global) = global_file::global_settings_path() {
            paths.push(global);
        }
        paths.push(workspace_file::workspace_settings_path(&self.workspace_root));
        paths
    }

    /// Re-read the settings files.
    pub fn reload_sources(&self) -> Result<(), StoreError> {
        let documents = read_documents(&self.workspace_root)?;
        let layered = build_layered(&self.workspace_root)?;
        *self.documents.write() = documents;
        *self.layered.write() = layered;
        info!(workspace = %self.workspace_root.display(), "Settings files reloaded");
        Ok(())
    }

    /// The `[logging]` table, when one of the settings files has it.
    pub fn logging(&self) -> Option<LoggingConfig> {
        self.layered.read().get::<LoggingConfig>("logging").ok()
    }
}

impl SettingsStore for FileSettings {
    fn get(&self, namespace: &str, key: &str) -> Option<Value> {
        let path = setting_path(namespace, key);
        self.documents
            .read()
            .iter()
            .rev()
            .find_map(|document| lookup(document, &path))
            .and_then(|value| serde_json::to_value(value).ok())
    }

    /// Write `value` into the workspace settings file, then re-read all layers. `null`
    /// removes the key.
    fn update(&self, namespace: &str, key: &str, value: Value) -> Result<(), StoreError> {
        let path = workspace_file::workspace_settings_path(&self.workspace_root);
        let mut document = read_document(&path)?;
        write_path(&mut document, &setting_path(namespace, key), to_toml(&value));

        let serialized = toml::to_string(&document).map_err(|e| StoreError::Malformed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, serialized)?;
        std::fs::rename(&tmp, &path)?;
        info!(namespace, key, path = %path.display(), "Setting written");

        self.reload_sources()
    }
}

fn build_layered(workspace_root: &Path) -> Result<Layered, StoreError> {
    let mut builder = Layered::builder();
    builder = global_file::add_to_builder(builder)?;
    builder = workspace_file::add_to_builder(builder, workspace_root)?;
    Ok(builder.build()?)
}

fn read_documents(workspace_root: &Path) -> Result<Vec<Table>, StoreError> {
    let mut documents = Vec::new();
    if let Some(global) = global_file::global_settings_path() {
        documents.push(read_document(&global)?);
    }
    documents.push(read_document(&workspace_file::workspace_settings_path(
        workspace_root,
    ))?);
    Ok(documents)
}

/// Parse one settings file. A missing file is an empty document.
fn read_document(path: &Path) -> Result<Table, StoreError> {
    if !path.exists() {
        debug!(path = %path.display(), "Settings file missing");
        return Ok(Table::new());
    }
    let raw = std::fs::read_to_string(path)?;
    raw.parse::<Table>().map_err(|e| StoreError::Malformed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn setting_path(namespace: &str, key: &str) -> Vec<String> {
    namespace
        .split('.')
        .chain(key.split('.'))
        .map(str::to_string)
        .collect()
}

fn lookup<'a>(document: &'a Table, path: &[String]) -> Option<&'a TomlValue> {
    let (first, rest) = path.split_first()?;
    rest.iter()
        .try_fold(document.get(first)?, |value, segment| value.get(segment.as_str()))
}

/// Set or remove (`None`) the value at `path`, creating intermediate tables.
fn write_path(document: &mut Table, path: &[String], value: Option<TomlValue>) {
    let (last, parents) = match path.split_last() {
        Some(split) => split,
        None => return,
    };
    let mut current = document;
    for segment in parents {
        let entry = current
            .entry(segment.clone())
            .or_insert(TomlValue::Table(Table::new()));
        if !entry.is_table() {
            *entry = TomlValue::Table(Table::new());
        }
        current = match entry {
            TomlValue::Table(table) => table,
            _ => return,
        };
    }
    match value {
        Some(value) => {
            current.insert(last.clone(), value);
        }
        None => {
            current.remove(last);
        }
    }
}

/// TOML has no null: null values and null entries are dropped.
fn to_toml(value: &Value) -> Option<TomlValue> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(TomlValue::Boolean(*b)),
        Value::Number(n) => Some(match n.as_i64() {
            Some(i) => TomlValue::Integer(i),
            None => TomlValue::Float(n.as_f64().unwrap_or_default()),
        }),
        Value::String(s) => Some(TomlValue::String(s.clone())),
        Value::Array(items) => Some(TomlValue::Array(items.iter().filter_map(to_toml).collect())),
        Value::Object(fields) => Some(TomlValue::Table(
            fields
                .iter()
                .filter_map(|(k, v)| to_toml(v).map(|v| (k.clone(), v)))
                .collect(),
        )),
    }
}
