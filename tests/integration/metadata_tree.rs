//! Metadata tree provider over a configuration service.

use crate::integration::test_utils::memory_service;
use fiction_writer::config::constants::{DEFAULT_CATEGORY_ICON, NS_METADATA};
use fiction_writer::config::{Color, ConfigService, MemorySettings};
use fiction_writer::error::ApiError;
use fiction_writer::metadata::{
    ActiveDocumentSlot, Collapsible, DocumentUri, FileInfo, InMemoryMetadataCache, MetaValue,
    MetadataTreeProvider, Navigator, Selection, TreeViewHost,
};
use parking_lot::Mutex;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct Harness {
    config: ConfigService,
    documents: Arc<ActiveDocumentSlot>,
    cache: Arc<InMemoryMetadataCache>,
    provider: Arc<MetadataTreeProvider>,
}

fn harness(settings: MemorySettings) -> Harness {
    let (_, config) = memory_service(settings);
    let documents = Arc::new(ActiveDocumentSlot::new());
    let cache = Arc::new(InMemoryMetadataCache::new());
    let provider = MetadataTreeProvider::new(&config, documents.clone(), cache.clone()).unwrap();
    Harness {
        config,
        documents,
        cache,
        provider,
    }
}

fn open_document(h: &Harness, name: &str, front_matter: serde_json::Value) -> DocumentUri {
    let uri = DocumentUri::new(format!("file:///novel/{}", name));
    let summary_key = h.config.get_state().unwrap().meta_summary_category_name.clone();
    h.cache.insert(
        uri.clone(),
        FileInfo::from_front_matter(
            MetaValue::from(front_matter),
            Some(PathBuf::from(format!("/novel/{}.yml", name))),
            &summary_key,
        ),
    );
    h.documents.focus(uri.clone());
    uri
}

fn labels(h: &Harness) -> Vec<(String, String)> {
    h.provider
        .get_children(None)
        .iter()
        .map(|n| (n.label.clone(), n.description.clone()))
        .collect()
}

fn chapter() -> serde_json::Value {
    json!({
        "title": "The Storm",
        "tags": ["Draft", "act-one"],
        "summary": "Ships are lost."
    })
}

#[derive(Default)]
struct RecordingView {
    messages: Mutex<Vec<String>>,
}

impl TreeViewHost for RecordingView {
    fn set_message(&self, message: &str) -> Result<(), ApiError> {
        self.messages.lock().push(message.to_string());
        Ok(())
    }
}

struct BrokenView;

impl TreeViewHost for BrokenView {
    fn set_message(&self, _message: &str) -> Result<(), ApiError> {
        Err(ApiError::HostError("view disposed".to_string()))
    }
}

#[derive(Default)]
struct RecordingNavigator {
    opened: Mutex<Vec<(PathBuf, Selection)>>,
}

impl Navigator for RecordingNavigator {
    fn open(&self, path: &Path, selection: Selection) -> Result<(), ApiError> {
        self.opened.lock().push((path.to_path_buf(), selection));
        Ok(())
    }
}

#[test]
fn test_unbound_provider_has_no_rows() {
    let h = harness(MemorySettings::new());
    open_document(&h, "ch1", chapter());
    assert!(!h.provider.is_bound());
    assert!(h.provider.get_children(None).is_empty());
}

#[test]
fn test_refresh_projects_front_matter() {
    let h = harness(MemorySettings::new());
    open_document(&h, "ch1", chapter());
    let info = h.provider.refresh().unwrap();
    assert_eq!(info.summary.as_deref(), Some("Ships are lost."));

    assert_eq!(
        labels(&h),
        vec![
            ("title".to_string(), "The Storm".to_string()),
            ("tags".to_string(), String::new()),
            ("summary".to_string(), "Ships are lost.".to_string()),
        ]
    );

    let rows = h.provider.get_children(None);
    let tags = &rows[1];
    assert_eq!(tags.collapsible, Collapsible::Expanded);

    let items = h.provider.get_children(Some(tags));
    let descriptions: Vec<&str> = items.iter().map(|n| n.description.as_str()).collect();
    assert_eq!(descriptions, vec!["Draft", "act-one"]);
    assert!(items.iter().all(|n| n.parent_key() == Some("tags")));
}

#[test]
fn test_rows_are_decorated_with_icons_and_keyword_colors() {
    let settings = MemorySettings::new()
        .with(NS_METADATA, "categories.icons", json!({"Tags": "tag"}))
        .with(NS_METADATA, "keywords.colors", json!({"draft": "orange"}));
    let h = harness(settings);
    open_document(&h, "ch1", chapter());
    h.provider.refresh();

    let rows = h.provider.get_children(None);
    let title_icon = rows[0].icon.as_ref().unwrap();
    assert_eq!(title_icon.id, DEFAULT_CATEGORY_ICON);

    let items = h.provider.get_children(Some(&rows[1]));
    let draft = items[0].icon.as_ref().unwrap();
    assert_eq!(draft.id, "tag");
    assert_eq!(draft.color, Some(Color::themed("orange")));
    assert_eq!(items[1].icon.as_ref().unwrap().color, None);
}

#[test]
fn test_summary_row_hidden_when_summary_category_enabled() {
    let h = harness(MemorySettings::new());
    open_document(&h, "ch1", chapter());
    h.config
        .set_local("metaSummaryCategoryEnabled", true)
        .unwrap();

    let keys: Vec<String> = h
        .provider
        .get_children(None)
        .iter()
        .map(|n| n.key.clone())
        .collect();
    assert_eq!(keys, vec!["title", "tags"]);
}

#[test]
fn test_hidden_category_names_collapse_single_key_wrappers() {
    let h = harness(MemorySettings::new());
    h.config
        .set_local("metaCategoryNamesEnabled", false)
        .unwrap();
    open_document(&h, "ch2", json!({"setting": {"city": "Oslo"}}));
    h.provider.refresh();

    let rows = h.provider.get_children(None);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].label, "Oslo");
    assert_eq!(rows[0].description, "");
    assert_eq!(rows[0].parent_key(), Some("city"));
}

#[test]
fn test_summary_message_is_pushed_to_the_view() {
    let h = harness(MemorySettings::new());
    let view = Arc::new(RecordingView::default());
    h.provider.bind_view(view.clone());
    h.config
        .set_local("metaSummaryCategoryEnabled", true)
        .unwrap();
    view.messages.lock().clear();

    open_document(&h, "ch1", chapter());
    h.provider.refresh();

    assert_eq!(
        *view.messages.lock(),
        vec![String::new(), "Ships are lost.".to_string()]
    );
}

#[test]
fn test_failing_view_does_not_block_rows() {
    let h = harness(MemorySettings::new());
    h.provider.bind_view(Arc::new(BrokenView));
    h.config
        .set_local("metaSummaryCategoryEnabled", true)
        .unwrap();
    open_document(&h, "ch1", chapter());

    assert!(h.provider.refresh().is_some());
    assert_eq!(h.provider.get_children(None).len(), 2);
}

#[test]
fn test_configuration_change_refreshes_the_tree() {
    let h = harness(MemorySettings::new());
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    h.provider.on_did_change_tree_data().subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    open_document(&h, "ch1", chapter());
    h.config.reload(None);

    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(h.provider.is_bound());
    assert_eq!(h.provider.get_children(None).len(), 3);
}

#[test]
fn test_detached_provider_ignores_configuration_changes() {
    let h = harness(MemorySettings::new());
    open_document(&h, "ch1", chapter());
    assert!(h.provider.detach(&h.config));

    h.config.reload(None);
    assert!(!h.provider.is_bound());
}

#[test]
fn test_clear_unbinds() {
    let h = harness(MemorySettings::new());
    open_document(&h, "ch1", chapter());
    h.provider.refresh();
    assert!(!h.provider.get_children(None).is_empty());

    h.provider.clear();
    assert!(h.provider.get_children(None).is_empty());
}

#[test]
fn test_focus_change_follows_active_document() {
    let h = harness(MemorySettings::new());
    open_document(&h, "ch1", chapter());
    open_document(&h, "ch2", json!({"title": "Calm"}));
    h.provider.refresh();
    assert_eq!(labels(&h), vec![("title".to_string(), "Calm".to_string())]);

    h.documents.blur();
    assert!(h.provider.refresh().is_none());
    assert!(h.provider.get_children(None).is_empty());
}

#[test]
fn test_open_navigates_to_metadata_file() {
    let h = harness(MemorySettings::new());
    let navigator = RecordingNavigator::default();
    assert!(!h.provider.open(&navigator).unwrap());

    open_document(&h, "ch1", chapter());
    h.provider.refresh();
    assert!(h.provider.open(&navigator).unwrap());

    let opened = navigator.opened.lock();
    assert_eq!(opened.len(), 1);
    assert_eq!(opened[0].0, PathBuf::from("/novel/ch1.yml"));
    assert_eq!(opened[0].1, Selection::default());
}

#[test]
fn test_get_tree_item_returns_the_node() {
    let h = harness(MemorySettings::new());
    open_document(&h, "ch1", chapter());
    h.provider.refresh();
    let rows = h.provider.get_children(None);
    assert!(Arc::ptr_eq(&h.provider.get_tree_item(&rows[0]), &rows[0]));
}
