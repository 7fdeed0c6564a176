//! Configuration System
//!
//! Resolves the editor settings namespaces into one immutable [`Config`] snapshot,
//! overlays per-workspace local overrides, and publishes each new snapshot to
//! subscribers. See [`ConfigService`] for the lifecycle.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub mod build;
pub mod constants;
pub mod file_settings;
pub mod local_store;
mod merge;
pub mod service;
pub mod settings_store;
mod sources;
pub mod watch;

pub use file_settings::FileSettings;
pub use local_store::{JsonFileLocalStore, LocalStore, LocalStoreExt, MemoryLocalStore};
pub use service::ConfigService;
pub use settings_store::{read_setting, MemorySettings, SettingsStore};
pub use watch::SettingsWatcher;

/// Paths of the global user settings file and workspace files.
pub mod paths {
    pub use super::sources::global_file::global_settings_path;
    pub use super::sources::workspace_file::{workspace_settings_path, workspace_state_path};
}

/// A theme color reference such as `fictionwriter.red`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    /// Color in the extension's theme namespace.
    pub fn themed(name: &str) -> Self {
        Color(format!("{}.{}", constants::COLOR_NAMESPACE, name))
    }

    /// Full theme id.
    pub fn id(&self) -> &str {
        &self.0
    }

    /// Color name without the theme namespace.
    pub fn name(&self) -> &str {
        self.0
            .strip_prefix(constants::COLOR_NAMESPACE)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(&self.0)
    }
}

/// Opaque token describing what triggered a reload. Carried through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Where the change came from (a file path, a command name, ...)
    pub origin: String,
    /// Settings sections touched by the change, when known
    pub sections: Vec<String>,
}

impl ChangeEvent {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            sections: Vec::new(),
        }
    }

    pub fn with_sections(mut self, sections: impl IntoIterator<Item = String>) -> Self {
        self.sections = sections.into_iter().collect();
        self
    }
}

/// Fully resolved settings snapshot.
///
/// Serialized field names (camelCase) double as local override keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Event that produced this snapshot
    #[serde(skip)]
    pub change_event: Option<ChangeEvent>,

    // Editing
    pub keybindings_disabled: bool,
    pub inverse_enter: bool,

    // Dialogue
    pub dialogue_prefix: String,
    pub is_dialogue_enabled: bool,
    pub dialogue_marker_auto_replace: bool,
    pub dialogue_marker_auto_detect: bool,
    pub dialogue_indent_auto_detect: bool,
    pub dialogue_indent_length: i64,
    pub dialogue_indent: String,

    // Export
    pub compile_template_file: String,
    pub compile_use_template_file: bool,
    pub compile_output_format: String,
    pub compile_show_format_picker: bool,
    pub compile_em_dash: bool,
    pub compile_show_save_dialogue: bool,
    pub compile_skip_comments_from_toc: bool,
    pub compile_toc_filename: String,
    pub compile_shows_error_in_output_file: bool,
    pub compile_include_is_enabled: bool,
    pub compile_search_document_ids_in_all_opened: bool,

    // Text formatting
    pub formatting_is_enabled: bool,
    pub formatting_fix_mismatch_dialogue_markers: bool,
    pub formatting_fix_dialogue_indents: bool,
    pub formatting_fix_paragraph_spacing: bool,
    pub formatting_fix_paragraph_breaks: String,
    pub formatting_remove_extra_spaces: bool,
    pub formatting_remove_extra_lines: bool,
    pub formatting_remove_trailing_spaces: bool,

    // View
    pub view_file_tags: BTreeMap<String, String>,
    pub view_dialogue_highlight: bool,
    pub view_dialogue_highlight_markers: bool,
    pub view_fade_metadata: bool,
    pub view_zen_mode_enabled: bool,
    pub view_zen_mode_theme: String,
    pub view_zen_mode_font_size: i64,
    pub wrap_indent: i64,
    pub fold_sentences: bool,
    pub view_status_bar_enabled: bool,

    // Smart edit
    pub smart_edit_enabled: bool,
    pub smart_edit_rename_related: String,

    // Metadata
    pub meta_enabled: bool,
    pub meta_keyword_colors: BTreeMap<String, Color>,
    pub meta_keyword_show_in_file_explorer: bool,
    pub meta_keyword_show_in_metadata_view: bool,
    pub meta_categories: BTreeMap<String, String>,
    pub meta_category_icons_enabled: bool,
    pub meta_category_names_enabled: bool,
    pub meta_summary_category_name: String,
    pub meta_summary_category_enabled: bool,
    pub meta_easy_lists: String,
    pub meta_default_category: String,
    pub meta_keyword_badge_category: String,
    pub meta_keyword_color_category: String,
    pub meta_file_badges: BTreeMap<String, String>,
    pub meta_keywords_show_badges: bool,

    /// Locally overridden keys that have no typed field
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for Config {
    fn default() -> Self {
        let dialogue_prefix = constants::dialogue_prefix(constants::dialogue::TWO_HYPHENS);
        Self {
            change_event: None,

            keybindings_disabled: false,
            inverse_enter: true,

            dialogue_prefix: dialogue_prefix.to_string(),
            is_dialogue_enabled: !dialogue_prefix.is_empty(),
            dialogue_marker_auto_replace: true,
            dialogue_marker_auto_detect: false,
            dialogue_indent_auto_detect: true,
            dialogue_indent_length: 0,
            dialogue_indent: " ".repeat(dialogue_prefix.chars().count()),

            compile_template_file: String::new(),
            compile_use_template_file: false,
            compile_output_format: constants::DEFAULT_OUTPUT_FORMAT.to_string(),
            compile_show_format_picker: true,
            compile_em_dash: true,
            compile_show_save_dialogue: true,
            compile_skip_comments_from_toc: true,
            compile_toc_filename: "toc.md".to_string(),
            compile_shows_error_in_output_file: true,
            compile_include_is_enabled: true,
            compile_search_document_ids_in_all_opened: false,

            formatting_is_enabled: true,
            formatting_fix_mismatch_dialogue_markers: true,
            formatting_fix_dialogue_indents: true,
            formatting_fix_paragraph_spacing: true,
            formatting_fix_paragraph_breaks: constants::paragraph_breaks::NONE.to_string(),
            formatting_remove_extra_spaces: true,
            formatting_remove_extra_lines: true,
            formatting_remove_trailing_spaces: true,

            view_file_tags: BTreeMap::new(),
            view_dialogue_highlight: false,
            view_dialogue_highlight_markers: true,
            view_fade_metadata: true,
            view_zen_mode_enabled: false,
            view_zen_mode_theme: String::new(),
            view_zen_mode_font_size: 0,
            wrap_indent: 0,
            fold_sentences: true,
            view_status_bar_enabled: true,

            smart_edit_enabled: false,
            smart_edit_rename_related: constants::rename_related::ASK.to_string(),

            meta_enabled: true,
            meta_keyword_colors: BTreeMap::new(),
            meta_keyword_show_in_file_explorer: true,
            meta_keyword_show_in_metadata_view: true,
            meta_categories: BTreeMap::new(),
            meta_category_icons_enabled: true,
            meta_category_names_enabled: true,
            meta_summary_category_name: "summary".to_string(),
            meta_summary_category_enabled: false,
            meta_easy_lists: ",".to_string(),
            meta_default_category: "tags".to_string(),
            meta_keyword_badge_category: "tags".to_string(),
            meta_keyword_color_category: "tags".to_string(),
            meta_file_badges: BTreeMap::new(),
            meta_keywords_show_badges: true,

            extra: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Read a field by its override key.
    pub fn get(&self, key: &str) -> Option<Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(mut fields)) => fields.remove(key),
            _ => None,
        }
    }
}
