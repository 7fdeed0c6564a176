//! Document identity, cached front-matter, and the host seams that supply them.

use crate::metadata::value::{MetaValue, Scalar};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Identity of an open document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentUri(String);

impl DocumentUri {
    pub fn new(uri: impl Into<String>) -> Self {
        DocumentUri(uri.into())
    }

    pub fn from_path(path: &Path) -> Self {
        DocumentUri(format!("file://{}", path.display()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parsed front-matter and where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub value: MetaValue,
    /// File holding the metadata, target of "open metadata"
    pub location: Option<PathBuf>,
}

/// Cached metadata for one document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FileInfo {
    pub metadata: Option<DocumentMetadata>,
    pub summary: Option<String>,
}

impl FileInfo {
    /// Wrap parsed front-matter, taking the summary from the `summary_key` entry.
    /// List summaries are joined with spaces.
    pub fn from_front_matter(value: MetaValue, location: Option<PathBuf>, summary_key: &str) -> Self {
        let summary = value.get(summary_key).and_then(summary_text);
        Self {
            metadata: Some(DocumentMetadata { value, location }),
            summary,
        }
    }

    /// True when there is front-matter to show.
    pub fn has_values(&self) -> bool {
        self.metadata
            .as_ref()
            .map(|m| m.value != MetaValue::Null)
            .unwrap_or(false)
    }
}

fn summary_text(value: &MetaValue) -> Option<String> {
    match value {
        MetaValue::Scalar(Scalar::String(text)) => Some(text.clone()),
        MetaValue::Scalar(scalar) => Some(scalar.to_string()),
        MetaValue::Sequence(items) => {
            let parts: Vec<String> = items
                .iter()
                .map(MetaValue::display_text)
                .filter(|s| !s.is_empty())
                .collect();
            (!parts.is_empty()).then(|| parts.join(" "))
        }
        _ => None,
    }
}

/// Host-owned cache of parsed front-matter.
pub trait MetadataCache: Send + Sync {
    fn get(&self, uri: &DocumentUri) -> Option<FileInfo>;
}

/// Host accessor for the focused document.
pub trait ActiveDocument: Send + Sync {
    fn active_document(&self) -> Option<DocumentUri>;
}

#[derive(Debug, Default)]
pub struct InMemoryMetadataCache {
    entries: RwLock<HashMap<DocumentUri, FileInfo>>,
}

impl InMemoryMetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, uri: DocumentUri, info: FileInfo) -> Option<FileInfo> {
        self.entries.write().insert(uri, info)
    }

    pub fn remove(&self, uri: &DocumentUri) -> Option<FileInfo> {
        self.entries.write().remove(uri)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl MetadataCache for InMemoryMetadataCache {
    fn get(&self, uri: &DocumentUri) -> Option<FileInfo> {
        self.entries.read().get(uri).cloned()
    }
}

/// Focus tracker for hosts that report focus changes imperatively.
#[derive(Debug, Default)]
pub struct ActiveDocumentSlot {
    current: RwLock<Option<DocumentUri>>,
}

impl ActiveDocumentSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self, uri: DocumentUri) {
        *self.current.write() = Some(uri);
    }

    pub fn blur(&self) {
        *self.current.write() = None;
    }
}

impl ActiveDocument for ActiveDocumentSlot {
    fn active_document(&self) -> Option<DocumentUri> {
        self.current.read().clone()
    }
}
