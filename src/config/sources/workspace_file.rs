//! Workspace settings file source: <workspace>/.fiction-writer/settings.toml

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::{File, FileFormat};
use std::path::{Path, PathBuf};

/// Directory holding per-workspace files.
pub const WORKSPACE_DIR: &str = ".fiction-writer";

pub fn workspace_settings_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(WORKSPACE_DIR).join("settings.toml")
}

/// Location of the persisted local override store.
pub fn workspace_state_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(WORKSPACE_DIR).join("state.json")
}

/// Add the workspace settings file to the builder. Overrides the global file.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = workspace_settings_path(workspace_root);
    if path.exists() {
        return Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(false)));
    }
    Ok(builder)
}
