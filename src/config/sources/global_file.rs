//! Global settings file source: $FICTION_WRITER_CONFIG_HOME/settings.toml or the platform
//! config dir (e.g. ~/.config/fiction-writer/settings.toml).

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::{File, FileFormat};
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::debug;

/// Path to the global settings file.
pub fn global_settings_path() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("FICTION_WRITER_CONFIG_HOME") {
        return Some(PathBuf::from(home).join("settings.toml"));
    }
    ProjectDirs::from("", "", "fiction-writer").map(|dirs| dirs.config_dir().join("settings.toml"))
}

/// Add the global settings file to the builder if it exists.
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if let Some(path) = global_settings_path() {
        if path.exists() {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        } else {
            debug!(
                settings_path = %path.display(),
                "No global settings file; using workspace settings and defaults"
            );
        }
    }
    Ok(builder)
}
