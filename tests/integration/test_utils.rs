//! Shared test utilities for integration tests
//!
//! Settings files are read from `FICTION_WRITER_CONFIG_HOME` and the workspace, so tests
//! that touch the filesystem run with that variable pointed at a temp dir.

use fiction_writer::config::{ConfigService, MemoryLocalStore, MemorySettings};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Serializes access to process environment variables across tests.
static CONFIG_HOME_MUTEX: Mutex<()> = Mutex::new(());

/// Run `f` with the global settings directory isolated inside `test_dir`.
pub fn with_config_home<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = CONFIG_HOME_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let previous = std::env::var("FICTION_WRITER_CONFIG_HOME").ok();

    let config_home = test_dir.path().join("config-home");
    std::fs::create_dir_all(&config_home).unwrap();
    std::env::set_var("FICTION_WRITER_CONFIG_HOME", &config_home);

    let result = f();

    match previous {
        Some(value) => std::env::set_var("FICTION_WRITER_CONFIG_HOME", value),
        None => std::env::remove_var("FICTION_WRITER_CONFIG_HOME"),
    }
    result
}

/// Write `<workspace>/.fiction-writer/settings.toml`.
pub fn write_workspace_settings(workspace: &Path, contents: &str) {
    let dir = workspace.join(".fiction-writer");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("settings.toml"), contents).unwrap();
}

/// A configured service over in-memory stores.
pub fn memory_service(settings: MemorySettings) -> (Arc<MemorySettings>, ConfigService) {
    let settings = Arc::new(settings);
    let service = ConfigService::new(settings.clone(), Arc::new(MemoryLocalStore::new()));
    (settings, service)
}
