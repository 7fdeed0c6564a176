//! Metadata tree provider.
//!
//! Projects the focused document's front-matter into tree rows for the host's tree
//! widget. The provider is either bound to a document (metadata cached by the last
//! `refresh`) or unbound (after `clear`, or before the first `refresh`); unbound, it
//! produces no rows. Every configuration change re-runs `refresh`.

use crate::config::{Config, ConfigService};
use crate::error::ApiError;
use crate::metadata::cache::{ActiveDocument, DocumentUri, FileInfo, MetadataCache};
use crate::metadata::decorate::decorate;
use crate::metadata::flatten::{parse_object_tree, FlattenOptions};
use crate::metadata::node::MetadataNode;
use crate::metadata::value::MetaValue;
use crate::observer::{Observable, SubscriptionId};
use parking_lot::{Mutex, RwLock};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Zero-based line/character position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

/// Selection to apply when opening a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: Position,
    pub end: Position,
}

/// Tree widget owned by the host.
pub trait TreeViewHost: Send + Sync {
    /// Text shown above the tree rows. Empty clears it.
    fn set_message(&self, message: &str) -> Result<(), ApiError>;
}

/// Host command that opens a file in the editor.
pub trait Navigator: Send + Sync {
    fn open(&self, path: &Path, selection: Selection) -> Result<(), ApiError>;
}

/// Payload of the tree-changed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeChanged;

#[derive(Debug, Default)]
struct Binding {
    document: Option<DocumentUri>,
    file_info: Option<FileInfo>,
}

pub struct MetadataTreeProvider {
    documents: Arc<dyn ActiveDocument>,
    cache: Arc<dyn MetadataCache>,
    config: RwLock<Arc<Config>>,
    binding: RwLock<Binding>,
    view: RwLock<Option<Arc<dyn TreeViewHost>>>,
    tree_changed: Observable<TreeChanged>,
    subscription: Mutex<Option<SubscriptionId>>,
}

impl MetadataTreeProvider {
    /// Create a provider that follows `config_service`.
    pub fn new(
        config_service: &ConfigService,
        documents: Arc<dyn ActiveDocument>,
        cache: Arc<dyn MetadataCache>,
    ) -> Result<Arc<Self>, ApiError> {
        let initial = config_service.get_state()?;
        let provider = Arc::new(Self {
            documents,
            cache,
            config: RwLock::new(initial),
            binding: RwLock::new(Binding::default()),
            view: RwLock::new(None),
            tree_changed: Observable::new(),
            subscription: Mutex::new(None),
        });

        let weak = Arc::downgrade(&provider);
        let id = config_service.subscribe(move |snapshot| {
            if let Some(provider) = weak.upgrade() {
                provider.on_state_change(Arc::clone(snapshot));
            }
        });
        *provider.subscription.lock() = Some(id);

        Ok(provider)
    }

    /// Stop following configuration changes.
    pub fn detach(&self, config_service: &ConfigService) -> bool {
        match self.subscription.lock().take() {
            Some(id) => config_service.unsubscribe(id),
            None => false,
        }
    }

    /// Attach the tree widget that shows the summary message.
    pub fn bind_view(&self, view: Arc<dyn TreeViewHost>) {
        *self.view.write() = Some(view);
    }

    /// Fired whenever the rows may have changed.
    pub fn on_did_change_tree_data(&self) -> &Observable<TreeChanged> {
        &self.tree_changed
    }

    /// Configuration snapshot the provider currently renders with.
    pub fn state(&self) -> Arc<Config> {
        self.config.read().clone()
    }

    pub fn is_bound(&self) -> bool {
        let binding = self.binding.read();
        binding.document.is_some() && binding.file_info.is_some()
    }

    fn on_state_change(&self, snapshot: Arc<Config>) {
        *self.config.write() = snapshot;
        self.refresh();
    }

    /// Re-read the focused document's cached metadata and notify the tree.
    pub fn refresh(&self) -> Option<FileInfo> {
        let document = self.documents.active_document();
        let info = document.as_ref().and_then(|uri| self.cache.get(uri));

        if let Some(info) = &info {
            self.update_message(info);
        }

        {
            let mut binding = self.binding.write();
            binding.document = document;
            binding.file_info = info.clone();
        }

        debug!(bound = info.is_some(), "Metadata tree refreshed");
        self.tree_changed.notify(Arc::new(TreeChanged));
        info
    }

    /// Display failures are logged and dropped; they never block tree population.
    fn update_message(&self, info: &FileInfo) {
        let view = match self.view.read().clone() {
            Some(view) => view,
            None => return,
        };
        let show_summary = self.config.read().meta_summary_category_enabled;

        let result = view.set_message("").and_then(|_| {
            if info.has_values() && show_summary {
                view.set_message(info.summary.as_deref().unwrap_or(""))
            } else {
                Ok(())
            }
        });
        if let Err(e) = result {
            warn!(error = %e, "Failed to update metadata summary message");
        }
    }

    /// Unbind from the current document.
    pub fn clear(&self) {
        self.binding.write().document = None;
        self.tree_changed.notify(Arc::new(TreeChanged));
    }

    pub fn get_tree_item(&self, node: &Arc<MetadataNode>) -> Arc<MetadataNode> {
        Arc::clone(node)
    }

    /// Rows under `element`, or the top-level rows when `element` is `None`.
    pub fn get_children(&self, element: Option<&Arc<MetadataNode>>) -> Vec<Arc<MetadataNode>> {
        let root = {
            let binding = self.binding.read();
            match (&binding.document, &binding.file_info) {
                (Some(_), Some(info)) => info
                    .metadata
                    .as_ref()
                    .map(|m| m.value.clone())
                    .unwrap_or(MetaValue::Null),
                _ => return Vec::new(),
            }
        };

        let config = self.state();
        let options = FlattenOptions::from(config.as_ref());
        let mut nodes = match element {
            Some(parent) => parse_object_tree(&parent.value, Some(parent), &options),
            None => parse_object_tree(&root, None, &options),
        };

        if element.is_none() && config.meta_summary_category_enabled {
            nodes.retain(|node| node.key != config.meta_summary_category_name);
        }

        for node in &mut nodes {
            decorate(node, &config);
        }

        nodes.into_iter().map(Arc::new).collect()
    }

    /// Open the metadata's source file at its first line. Returns false when the bound
    /// document has no metadata location.
    pub fn open(&self, navigator: &dyn Navigator) -> Result<bool, ApiError> {
        let location = self
            .binding
            .read()
            .file_info
            .as_ref()
            .and_then(|info| info.metadata.as_ref())
            .and_then(|meta| meta.location.clone());

        match location {
            Some(path) => {
                navigator.open(&path, Selection::default())?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
