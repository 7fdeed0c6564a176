//! Snapshot resolution from settings namespaces.

use crate::integration::test_utils::memory_service;
use fiction_writer::config::constants::{dialogue, NS_EDIT, NS_EDIT_DIALOGUE, NS_METADATA, NS_VIEW};
use fiction_writer::config::{ChangeEvent, Color, Config, MemorySettings};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_empty_settings_resolve_to_defaults() {
    let (_, service) = memory_service(MemorySettings::new());
    let state = service.get_state().unwrap();

    assert_eq!(state.dialogue_prefix, "--");
    assert!(state.is_dialogue_enabled);
    assert_eq!(state.dialogue_indent, "  ");
    assert!(state.inverse_enter);
    assert_eq!(state.compile_output_format, "odt");
    assert_eq!(state.meta_summary_category_name, "summary");
    assert!(!state.meta_summary_category_enabled);
    assert_eq!(*state, Config::default());
}

#[test]
fn test_disabled_marker_forces_dialogue_fields_off() {
    let settings = MemorySettings::new()
        .with(NS_EDIT_DIALOGUE, "marker", dialogue::DISABLED)
        .with(NS_EDIT_DIALOGUE, "sentenceIndentLength", 6)
        .with(NS_EDIT_DIALOGUE, "markerAutoReplace", true)
        .with(NS_EDIT_DIALOGUE, "sentenceIndentAutoDetect", true)
        .with("markdown-fiction-writer.textFormatting", "fixDialogueIndents", true);
    let (_, service) = memory_service(settings);
    let state = service.get_state().unwrap();

    assert!(!state.is_dialogue_enabled);
    assert_eq!(state.dialogue_prefix, "");
    assert_eq!(state.dialogue_indent, "");
    assert_eq!(state.dialogue_indent_length, 0);
    assert!(!state.dialogue_indent_auto_detect);
    assert!(!state.dialogue_marker_auto_replace);
    assert!(!state.dialogue_marker_auto_detect);
    assert!(!state.formatting_fix_dialogue_indents);
    assert!(!state.formatting_fix_mismatch_dialogue_markers);
}

#[test]
fn test_unknown_marker_disables_dialogue() {
    let settings = MemorySettings::new().with(NS_EDIT_DIALOGUE, "marker", "Tilde");
    let (_, service) = memory_service(settings);
    assert!(!service.get_state().unwrap().is_dialogue_enabled);
}

#[test]
fn test_indent_follows_prefix_or_configured_length() {
    let settings = MemorySettings::new()
        .with(NS_EDIT_DIALOGUE, "marker", dialogue::TWO_HYPHENS)
        .with(NS_EDIT_DIALOGUE, "sentenceIndentAutoDetect", false)
        .with(NS_EDIT_DIALOGUE, "sentenceIndentLength", -1);
    let (settings, service) = memory_service(settings);
    assert_eq!(service.get_state().unwrap().dialogue_indent, "  ");

    settings.set(NS_EDIT_DIALOGUE, "sentenceIndentLength", 4);
    let state = service.reload(None);
    assert_eq!(state.dialogue_indent, "    ");

    settings.set(NS_EDIT_DIALOGUE, "marker", dialogue::EM_DASH);
    settings.set(NS_EDIT_DIALOGUE, "sentenceIndentAutoDetect", true);
    let state = service.reload(None);
    assert_eq!(state.dialogue_prefix, "—");
    assert_eq!(state.dialogue_indent, " ");
}

#[test]
fn test_malformed_values_fall_back() {
    let settings = MemorySettings::new()
        .with(NS_EDIT, "disableKeybindings", "yes")
        .with(NS_VIEW, "wordWrapIndent", "wide")
        .with(NS_METADATA, "categories.icons", json!(["not", "a", "map"]));
    let (_, service) = memory_service(settings);
    let state = service.get_state().unwrap();

    assert!(!state.keybindings_disabled);
    assert_eq!(state.wrap_indent, 0);
    assert!(state.meta_categories.is_empty());
}

#[test]
fn test_keyword_colors_and_badges_are_normalized() {
    let settings = MemorySettings::new()
        .with(
            NS_METADATA,
            "keywords.colors",
            json!({"Draft": "orange", "Done": "none", "Empty": ""}),
        )
        .with(NS_METADATA, "keywords.badges", json!({"Draft": "DRAFT"}));
    let (_, service) = memory_service(settings);
    let state = service.get_state().unwrap();

    assert_eq!(
        state.meta_keyword_colors.get("draft"),
        Some(&Color::themed("orange"))
    );
    assert!(!state.meta_keyword_colors.contains_key("done"));
    assert!(!state.meta_keyword_colors.contains_key("empty"));
    assert_eq!(state.meta_file_badges.get("draft").map(String::as_str), Some("DR"));
}

#[test]
fn test_reload_is_idempotent_and_carries_event() {
    let settings = MemorySettings::new().with(NS_VIEW, "writingMode.fontSize", 18);
    let (_, service) = memory_service(settings);

    let first = service.reload(None);
    let event = ChangeEvent::new("settings.toml").with_sections(vec![NS_VIEW.to_string()]);
    let second = service.reload(Some(event.clone()));

    assert_eq!(second.change_event, Some(event));
    let mut comparable = (*second).clone();
    comparable.change_event = None;
    assert_eq!(*first, comparable);
    assert_eq!(second.view_zen_mode_font_size, 18);
}

#[test]
fn test_subscribers_see_every_reload_in_order() {
    let (_, service) = memory_service(MemorySettings::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

    for tag in ["first", "second"] {
        let calls = calls.clone();
        let order = order.clone();
        service.subscribe(move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            order.lock().push(tag);
        });
    }

    service.reload(None);
    service.reload(None);

    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(*order.lock(), vec!["first", "second", "first", "second"]);
}
