//! Global and workspace settings files.

use crate::integration::test_utils::{with_config_home, write_workspace_settings};
use fiction_writer::config::constants::{dialogue, NS_EDIT_DIALOGUE, NS_VIEW};
use fiction_writer::config::{ConfigService, FileSettings, JsonFileLocalStore, SettingsStore};
use fiction_writer::config::paths::workspace_state_path;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

const WORKSPACE_SETTINGS: &str = r#"
[markdown-fiction-writer.editDialogue]
marker = "Em Dash"
sentenceIndentAutoDetect = false
sentenceIndentLength = 3

[markdown-fiction-writer.view]
wordWrapIndent = 2
writingMode.fontSize = 20
"#;

#[test]
fn test_workspace_file_feeds_the_snapshot() {
    let temp = TempDir::new().unwrap();
    with_config_home(&temp, || {
        let workspace = temp.path().join("novel");
        write_workspace_settings(&workspace, WORKSPACE_SETTINGS);

        let settings = Arc::new(FileSettings::load(&workspace).unwrap());
        assert_eq!(
            settings.get(NS_EDIT_DIALOGUE, "marker"),
            Some(json!(dialogue::EM_DASH))
        );

        let local = Arc::new(JsonFileLocalStore::open(&workspace_state_path(&workspace)).unwrap());
        let service = ConfigService::new(settings, local);
        let state = service.get_state().unwrap();

        assert_eq!(state.dialogue_prefix, "—");
        assert_eq!(state.dialogue_indent, "   ");
        assert_eq!(state.wrap_indent, 2);
        assert_eq!(state.view_zen_mode_font_size, 20);
    });
}

#[test]
fn test_workspace_file_overrides_global_file() {
    let temp = TempDir::new().unwrap();
    with_config_home(&temp, || {
        std::fs::write(
            temp.path().join("config-home").join("settings.toml"),
            "[markdown-fiction-writer.view]\nwordWrapIndent = 7\nfadeMetadata = false\n",
        )
        .unwrap();
        let workspace = temp.path().join("novel");
        write_workspace_settings(&workspace, WORKSPACE_SETTINGS);

        let settings = FileSettings::load(&workspace).unwrap();
        assert_eq!(settings.get(NS_VIEW, "wordWrapIndent"), Some(json!(2)));
        assert_eq!(settings.get(NS_VIEW, "fadeMetadata"), Some(json!(false)));
    });
}

#[test]
fn test_missing_files_yield_defaults() {
    let temp = TempDir::new().unwrap();
    with_config_home(&temp, || {
        let settings = Arc::new(FileSettings::load(temp.path()).unwrap());
        assert_eq!(settings.get(NS_VIEW, "wordWrapIndent"), None);
        assert_eq!(settings.source_paths().len(), 2);

        let local = Arc::new(JsonFileLocalStore::open(&workspace_state_path(temp.path())).unwrap());
        let service = ConfigService::new(settings, local);
        assert_eq!(service.get_state().unwrap().dialogue_prefix, "--");
    });
}

#[test]
fn test_reload_sources_picks_up_edits() {
    let temp = TempDir::new().unwrap();
    with_config_home(&temp, || {
        let workspace = temp.path().join("novel");
        write_workspace_settings(&workspace, WORKSPACE_SETTINGS);
        let settings = Arc::new(FileSettings::load(&workspace).unwrap());
        let local = Arc::new(JsonFileLocalStore::open(&workspace_state_path(&workspace)).unwrap());
        let service = ConfigService::new(settings.clone(), local);

        write_workspace_settings(
            &workspace,
            "[markdown-fiction-writer.editDialogue]\nmarker = \"Disabled\"\n",
        );
        settings.reload_sources().unwrap();
        let state = service.reload(None);

        assert!(!state.is_dialogue_enabled);
        assert_eq!(state.dialogue_indent, "");
        assert_eq!(state.wrap_indent, 0);
    });
}

#[test]
fn test_restore_writes_through_to_file_settings() {
    let temp = TempDir::new().unwrap();
    with_config_home(&temp, || {
        let workspace = temp.path().join("novel");
        write_workspace_settings(&workspace, WORKSPACE_SETTINGS);
        let settings = Arc::new(FileSettings::load(&workspace).unwrap());
        let local = Arc::new(JsonFileLocalStore::open(&workspace_state_path(&workspace)).unwrap());
        let service = ConfigService::new(settings.clone(), local);

        assert_eq!(
            service.backup(NS_VIEW, "wordWrapIndent").unwrap(),
            Some(json!(2))
        );
        write_workspace_settings(&workspace, "[markdown-fiction-writer.view]\nwordWrapIndent = 9\n");
        settings.reload_sources().unwrap();
        assert_eq!(settings.get(NS_VIEW, "wordWrapIndent"), Some(json!(9)));

        assert!(service.restore(NS_VIEW, "wordWrapIndent").unwrap());
        assert_eq!(settings.get(NS_VIEW, "wordWrapIndent"), Some(json!(2)));
        assert_eq!(service.reload(None).wrap_indent, 2);
    });
}

#[test]
fn test_map_settings_keep_key_case() {
    let temp = TempDir::new().unwrap();
    with_config_home(&temp, || {
        let workspace = temp.path().join("novel");
        write_workspace_settings(
            &workspace,
            "[markdown-fiction-writer.view]\nfileTags.definitions = { Draft = \"D\", \"Mr. Smith\" = \"S\" }\n",
        );
        let settings = Arc::new(FileSettings::load(&workspace).unwrap());
        assert_eq!(
            settings.get(NS_VIEW, "fileTags.definitions"),
            Some(json!({ "Draft": "D", "Mr. Smith": "S" }))
        );

        let local = Arc::new(JsonFileLocalStore::open(&workspace_state_path(&workspace)).unwrap());
        let state = ConfigService::new(settings, local).get_state().unwrap();
        assert_eq!(state.view_file_tags.get("Draft").map(String::as_str), Some("D"));
    });
}

#[test]
fn test_logging_table_is_read_from_settings() {
    let temp = TempDir::new().unwrap();
    with_config_home(&temp, || {
        write_workspace_settings(temp.path(), "[logging]\nlevel = \"debug\"\n");
        let settings = FileSettings::load(temp.path()).unwrap();
        let logging = settings.logging().unwrap();
        assert_eq!(logging.level, "debug");
        assert_eq!(logging.format, "text");
    });
}
