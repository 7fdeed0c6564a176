//! CLI route: run context and the single route table.

use crate::cli::parse::{Commands, ConfigCommands, FlagCommands};
use crate::cli::presentation::{
    format_config_json, format_config_text, format_tree_json, format_tree_text,
};
use crate::config::paths::workspace_state_path;
use crate::config::{ConfigService, FileSettings, JsonFileLocalStore, SettingsWatcher};
use crate::error::ApiError;
use crate::metadata::{
    ActiveDocumentSlot, DocumentUri, FileInfo, InMemoryMetadataCache, MetaValue,
    MetadataTreeProvider,
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use tracing::info;

/// Runtime context for CLI execution: file-backed stores and the configuration service.
pub struct RunContext {
    workspace_root: PathBuf,
    settings: Arc<FileSettings>,
    config: Arc<ConfigService>,
}

impl RunContext {
    pub fn new(workspace_root: PathBuf) -> Result<Self, ApiError> {
        let settings = Arc::new(FileSettings::load(&workspace_root)?);
        let local = Arc::new(JsonFileLocalStore::open(&workspace_state_path(&workspace_root))?);
        let config = Arc::new(ConfigService::new(settings.clone(), local));

        Ok(Self {
            workspace_root,
            settings,
            config,
        })
    }

    pub fn config_service(&self) -> &ConfigService {
        &self.config
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Execute a CLI command via the route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Config { command } => self.handle_config(command),
            Commands::Flag { command } => self.handle_flag(command),
            Commands::Backup { namespace, key } => {
                match self.config.backup(namespace, key)? {
                    Some(value) => Ok(format!("Backed up {}.{} = {}", namespace, key, value)),
                    None => Ok(format!("{}.{} is not set; stored nothing", namespace, key)),
                }
            }
            Commands::Restore { namespace, key } => {
                if self.config.restore(namespace, key)? {
                    Ok(format!("Restored {}.{}", namespace, key))
                } else {
                    Ok(format!("No backup for {}.{}", namespace, key))
                }
            }
            Commands::Tree {
                file,
                format,
                no_color,
            } => self.handle_tree(file, format, !no_color),
            Commands::Watch => self.handle_watch(),
        }
    }

    fn handle_config(&self, command: &ConfigCommands) -> Result<String, ApiError> {
        match command {
            ConfigCommands::Show { format, key } => {
                let state = self.config.get_state()?;
                if format == "json" {
                    format_config_json(&state, key.as_deref())
                } else {
                    format_config_text(&state, key.as_deref())
                }
            }
            ConfigCommands::Set { key, value } => {
                let parsed = parse_cli_value(value);
                self.config.set_local(key, parsed.clone())?;
                Ok(format!("{} = {}", key, parsed))
            }
            ConfigCommands::Unset { key } => {
                let state = self.config.clear_local(key)?;
                let current = state.get(key).unwrap_or(Value::Null);
                Ok(format!("{} = {}", key, current))
            }
        }
    }

    fn handle_flag(&self, command: &FlagCommands) -> Result<String, ApiError> {
        match command {
            FlagCommands::Get { key } => Ok(self.config.get_flag(key).to_string()),
            FlagCommands::Set { key } => {
                self.config.set_flag(key)?;
                Ok(format!("{} = true", key))
            }
            FlagCommands::Clear { key } => {
                self.config.clear_flag(key)?;
                Ok(format!("{} = false", key))
            }
        }
    }

    fn handle_tree(&self, file: &Path, format: &str, use_color: bool) -> Result<String, ApiError> {
        let raw = std::fs::read_to_string(file).map_err(|e| {
            ApiError::InvalidMetadata(format!("Cannot read {}: {}", file.display(), e))
        })?;
        let value = match file.extension().and_then(|e| e.to_str()) {
            Some("toml") => MetaValue::from_toml_str(&raw)?,
            _ => MetaValue::from_json_str(&raw)?,
        };

        let state = self.config.get_state()?;
        let uri = DocumentUri::from_path(file);
        let cache = Arc::new(InMemoryMetadataCache::new());
        cache.insert(
            uri.clone(),
            FileInfo::from_front_matter(
                value,
                Some(file.to_path_buf()),
                &state.meta_summary_category_name,
            ),
        );
        let documents = Arc::new(ActiveDocumentSlot::new());
        documents.focus(uri);

        let provider = MetadataTreeProvider::new(&self.config, documents, cache.clone())?;
        let info = provider.refresh();
        provider.detach(&self.config);

        let body = if format == "json" {
            format_tree_json(&provider)
        } else {
            format_tree_text(&provider, use_color)
        };

        let summary = info
            .and_then(|i| i.summary)
            .filter(|_| state.meta_summary_category_enabled && format != "json");
        Ok(match summary {
            Some(summary) => format!("{}\n\n{}", summary, body),
            None => body,
        })
    }

    /// Blocks, printing one line per reload.
    fn handle_watch(&self) -> Result<String, ApiError> {
        let (tx, rx) = mpsc::channel();
        let id = self.config.subscribe(move |snapshot| {
            let origin = snapshot
                .change_event
                .as_ref()
                .map(|e| e.origin.clone())
                .unwrap_or_default();
            let _ = tx.send(origin);
        });

        let watcher = SettingsWatcher::start(self.settings.clone(), self.config.clone())?;
        info!(workspace = %self.workspace_root.display(), "Watching settings");
        println!(
            "Watching {} settings location(s); press Ctrl-C to stop.",
            watcher.watched().len()
        );

        for origin in rx.iter() {
            if origin.is_empty() {
                println!("Configuration updated");
            } else {
                println!("Configuration reloaded from {}", origin);
            }
        }

        self.config.unsubscribe(id);
        Ok("Stopped watching".to_string())
    }
}

/// CLI values are JSON when they parse as JSON, else plain strings.
fn parse_cli_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
