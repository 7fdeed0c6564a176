//! Settings file watcher.
//!
//! Turns edits to the settings files into `ConfigService::reload` calls, mirroring the
//! host's "configuration changed" notification.

use crate::config::constants::NAMESPACES;
use crate::config::file_settings::FileSettings;
use crate::config::service::ConfigService;
use crate::config::ChangeEvent;
use crate::error::ApiError;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Keeps the underlying watcher alive; dropping it stops reloads.
pub struct SettingsWatcher {
    _watcher: RecommendedWatcher,
    watched: Vec<PathBuf>,
}

impl SettingsWatcher {
    /// Watch every settings file of `settings` and reload `service` on change.
    pub fn start(settings: Arc<FileSettings>, service: Arc<ConfigService>) -> Result<Self, ApiError> {
        let files = settings.source_paths();
        let handler_files = files.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Some(path) = changed_settings_file(&event, &handler_files) {
                    if let Err(e) = settings.reload_sources() {
                        warn!(
                            path = %path.display(),
                            error = %e,
                            "Settings file unreadable, keeping previous values"
                        );
                        return;
                    }
                    service.reload(Some(settings_change(&path)));
                }
            }
            Err(e) => error!("Settings watch error: {}", e),
        })
        .map_err(|e| ApiError::HostError(format!("Failed to create watcher: {}", e)))?;

        let mut watched = Vec::new();
        for dir in watch_dirs(&files) {
            watcher
                .watch(&dir, RecursiveMode::NonRecursive)
                .map_err(|e| {
                    ApiError::HostError(format!("Failed to watch {}: {}", dir.display(), e))
                })?;
            watched.push(dir);
        }

        info!(directories = watched.len(), "Watching settings files");
        Ok(Self {
            _watcher: watcher,
            watched,
        })
    }

    /// Directories currently watched.
    pub fn watched(&self) -> &[PathBuf] {
        &self.watched
    }
}

/// Existing parent directories of the settings files, deduplicated.
fn watch_dirs(files: &[PathBuf]) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    for file in files {
        match file.parent() {
            Some(dir) if dir.is_dir() => {
                if !dirs.iter().any(|d| d == dir) {
                    dirs.push(dir.to_path_buf());
                }
            }
            _ => warn!(path = %file.display(), "Settings directory missing, not watched"),
        }
    }
    dirs
}

/// A file edit may touch any namespace.
fn settings_change(path: &Path) -> ChangeEvent {
    ChangeEvent::new(path.display().to_string())
        .with_sections(NAMESPACES.iter().map(|ns| ns.to_string()))
}

/// The settings file touched by `event`, if any.
fn changed_settings_file(event: &Event, files: &[PathBuf]) -> Option<PathBuf> {
    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => event
            .paths
            .iter()
            .find(|path| files.iter().any(|file| same_file(path, file)))
            .cloned(),
        _ => None,
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    // Removed files cannot be canonicalized, so compare names under canonical parents.
    let canonical_parent = |p: &Path| p.parent().and_then(|dir| dir.canonicalize().ok());
    let parent = canonical_parent(a);
    a.file_name() == b.file_name() && parent.is_some() && parent == canonical_parent(b)
}
