//! Snapshot derivation from the settings namespaces.
//!
//! Reads every namespace with typed fallbacks, derives the dialogue fields and the
//! decoration maps, then forces the dialogue-dependent fields off when no dialogue
//! marker is configured. Local overrides are applied afterwards by the merge policy.

use crate::config::constants::{self, *};
use crate::config::settings_store::{read_setting, SettingsStore};
use crate::config::{ChangeEvent, Color, Config};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Build a snapshot from the settings store alone.
pub fn resolve_namespaces(store: &dyn SettingsStore, event: Option<ChangeEvent>) -> Config {
    let defaults = Config::default();
    let read_bool = |ns: &str, key: &str, fallback: bool| read_setting(store, ns, key, fallback);
    let read_int = |ns: &str, key: &str, fallback: i64| read_setting(store, ns, key, fallback);
    let read_str = |ns: &str, key: &str, fallback: &str| {
        read_setting(store, ns, key, fallback.to_string())
    };

    let marker = read_str(NS_EDIT_DIALOGUE, "marker", dialogue::TWO_HYPHENS);
    let dialogue_prefix = constants::dialogue_prefix(&marker).to_string();
    let is_dialogue_enabled = !dialogue_prefix.is_empty();
    let meta_enabled = read_bool(NS_METADATA, "enabled", defaults.meta_enabled);

    let mut config = Config {
        change_event: event,

        keybindings_disabled: read_bool(NS_EDIT, "disableKeybindings", false),
        inverse_enter: read_str(NS_EDIT, "easyParagraphCreation", paragraph::NEW_ON_ENTER)
            == paragraph::NEW_ON_ENTER,

        dialogue_prefix,
        is_dialogue_enabled,
        dialogue_marker_auto_replace: read_bool(NS_EDIT_DIALOGUE, "markerAutoReplace", true),
        dialogue_marker_auto_detect: false,
        dialogue_indent_auto_detect: read_bool(NS_EDIT_DIALOGUE, "sentenceIndentAutoDetect", true),
        dialogue_indent_length: read_int(NS_EDIT_DIALOGUE, "sentenceIndentLength", 0),
        dialogue_indent: String::new(),

        compile_template_file: read_str(NS_EXPORT, "outputTemplate.file", ""),
        compile_use_template_file: read_bool(NS_EXPORT, "outputTemplate.enabled", false),
        compile_output_format: read_str(NS_EXPORT, "outputFormat.default", DEFAULT_OUTPUT_FORMAT),
        compile_show_format_picker: read_bool(NS_EXPORT, "outputFormat.alwaysShowFormatPicker", true),
        compile_em_dash: read_bool(NS_EXPORT, "smartDeshes", true),
        compile_show_save_dialogue: read_str(NS_EXPORT, "showSaveDialogue", save_dialogue::ALWAYS)
            == save_dialogue::ALWAYS,
        compile_skip_comments_from_toc: read_bool(NS_EXPORT, "skipCommentsFromToc", true),
        compile_toc_filename: read_str(NS_EXPORT, "tocFilename", "toc.md"),
        compile_shows_error_in_output_file: read_bool(
            NS_EXPORT,
            "include.showsErrorInOutputFile",
            true,
        ),
        compile_include_is_enabled: read_bool(NS_EXPORT, "include.enabled", true),
        compile_search_document_ids_in_all_opened: read_bool(
            NS_EXPORT,
            "include.searchDocumentIdsInAllOpenFilesAndWorkspaces",
            false,
        ),

        formatting_is_enabled: read_bool(NS_TEXT_FORMATTING, "enabled", true),
        formatting_fix_mismatch_dialogue_markers: read_bool(
            NS_TEXT_FORMATTING,
            "fixMismatchDialogueMarkers",
            true,
        ),
        formatting_fix_dialogue_indents: read_bool(NS_TEXT_FORMATTING, "fixDialogueIndents", true),
        formatting_fix_paragraph_spacing: read_bool(NS_TEXT_FORMATTING, "fixParagraphSpacing", true),
        formatting_fix_paragraph_breaks: read_str(
            NS_TEXT_FORMATTING,
            "fixParagraphBreaks",
            paragraph_breaks::NONE,
        ),
        formatting_remove_extra_spaces: read_bool(NS_TEXT_FORMATTING, "removeExtraSpaces", true),
        formatting_remove_extra_lines: read_bool(NS_TEXT_FORMATTING, "removeExtraLines", true),
        formatting_remove_trailing_spaces: read_bool(
            NS_TEXT_FORMATTING,
            "removeTrailingSpaces",
            true,
        ),

        view_file_tags: string_map(store, NS_VIEW, "fileTags.definitions"),
        view_dialogue_highlight: read_bool(NS_VIEW, "highlight.textBetweenQuotes", false),
        view_dialogue_highlight_markers: read_bool(NS_VIEW, "highlight.dialogueMarkers", true),
        view_fade_metadata: read_bool(NS_VIEW, "fadeMetadata", true),
        view_zen_mode_enabled: read_bool(NS_VIEW, "writingMode.enabled", false),
        view_zen_mode_theme: read_str(NS_VIEW, "writingMode.theme", ""),
        view_zen_mode_font_size: read_int(NS_VIEW, "writingMode.fontSize", 0),
        wrap_indent: read_int(NS_VIEW, "wordWrapIndent", 0),
        fold_sentences: read_bool(NS_VIEW, "foldParagraphLines", true),
        view_status_bar_enabled: read_bool(NS_VIEW, "statusBar.enabled", true),

        smart_edit_enabled: read_bool(NS_SMART_EDIT, "enabled", false),
        smart_edit_rename_related: read_str(
            NS_SMART_EDIT,
            "renameRelatedFiles",
            rename_related::ASK,
        ),

        meta_enabled,
        meta_keyword_colors: keyword_colors(store),
        meta_keyword_show_in_file_explorer: read_bool(
            NS_METADATA,
            "keywords.colorsInFileExplorer",
            true,
        ) && meta_enabled,
        meta_keyword_show_in_metadata_view: read_bool(
            NS_METADATA,
            "keywords.colorsInMetadataView",
            true,
        ) && meta_enabled,
        meta_categories: lowercase_keyed(store, NS_METADATA, "categories.icons", |icon| {
            Some(icon.to_string())
        }),
        meta_category_icons_enabled: read_bool(NS_METADATA, "categories.showIcons", true)
            && meta_enabled,
        meta_category_names_enabled: read_bool(NS_METADATA, "categories.showNames", true)
            && meta_enabled,
        meta_summary_category_name: read_str(NS_METADATA, "summaryCategoryName", "summary"),
        meta_summary_category_enabled: defaults.meta_summary_category_enabled,
        meta_easy_lists: read_str(NS_METADATA, "easyLists", ","),
        meta_default_category: read_str(NS_METADATA, "defaultCategory", "tags"),
        meta_keyword_badge_category: read_str(NS_METADATA, "keywords.badgesCategory", "tags"),
        meta_keyword_color_category: read_str(NS_METADATA, "keywords.colorsCategory", "tags"),
        meta_file_badges: lowercase_keyed(store, NS_METADATA, "keywords.badges", |badge| {
            Some(badge.chars().take(2).collect())
        }),
        meta_keywords_show_badges: read_bool(NS_METADATA, "keywords.badgesInFileExplorer", true)
            && meta_enabled,

        extra: BTreeMap::new(),
    };

    apply_dialogue_rules(&mut config);
    config
}

/// Force the dialogue-dependent fields off when dialogue is disabled, otherwise derive
/// the indent string.
pub fn apply_dialogue_rules(config: &mut Config) {
    if !config.is_dialogue_enabled {
        config.dialogue_indent = String::new();
        config.dialogue_indent_auto_detect = false;
        config.dialogue_indent_length = 0;
        config.dialogue_marker_auto_replace = false;
        config.dialogue_marker_auto_detect = false;
        config.formatting_fix_dialogue_indents = false;
        config.formatting_fix_mismatch_dialogue_markers = false;
        return;
    }

    let width = if config.dialogue_indent_length < 0 || config.dialogue_indent_auto_detect {
        config.dialogue_prefix.chars().count()
    } else {
        usize::try_from(config.dialogue_indent_length).unwrap_or_default()
    };
    config.dialogue_indent = " ".repeat(width);
}

fn keyword_colors(store: &dyn SettingsStore) -> BTreeMap<String, Color> {
    lowercase_keyed(store, NS_METADATA, "keywords.colors", |name| {
        if name.eq_ignore_ascii_case(COLOR_NONE) {
            None
        } else {
            Some(Color::themed(name))
        }
    })
}

fn string_map(store: &dyn SettingsStore, namespace: &str, key: &str) -> BTreeMap<String, String> {
    read_setting::<Map<String, Value>>(store, namespace, key, Map::new())
        .into_iter()
        .filter_map(|(k, v)| match v {
            Value::String(s) => Some((k, s)),
            other => {
                debug!(namespace, key, entry = %k, value = %other, "Skipping non-string entry");
                None
            }
        })
        .collect()
}

/// Iterate a raw settings object, lower-casing keys and skipping empty or non-string
/// values. `convert` may drop further values.
fn lowercase_keyed<T, F>(
    store: &dyn SettingsStore,
    namespace: &str,
    key: &str,
    convert: F,
) -> BTreeMap<String, T>
where
    F: Fn(&str) -> Option<T>,
{
    let raw = read_setting::<Map<String, Value>>(store, namespace, key, Map::new());
    let mut out = BTreeMap::new();
    for (entry, value) in raw {
        let text = match value.as_str() {
            Some(text) if !text.is_empty() => text,
            _ => continue,
        };
        if let Some(converted) = convert(text) {
            out.insert(entry.to_lowercase(), converted);
        }
    }
    out
}
