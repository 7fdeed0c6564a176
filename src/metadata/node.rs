//! Metadata tree node.

use crate::config::Color;
use crate::metadata::value::MetaValue;
use std::sync::Arc;

/// Expansion state of a node in the tree widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collapsible {
    /// Leaf
    None,
    /// Has children, shown expanded
    Expanded,
}

/// Icon glyph id plus optional theme color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeIcon {
    pub id: String,
    pub color: Option<Color>,
}

/// One row of the metadata tree.
///
/// Children are not stored; they are derived from `value` on demand. The parent link
/// therefore never forms a cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataNode {
    /// Property name, empty for list items and bare scalars
    pub key: String,
    pub label: String,
    pub description: String,
    /// Raw front-matter value behind this row
    pub value: MetaValue,
    /// Strong link. A collapsed single-key wrapper is a placeholder owned only by the
    /// rows under it, so a weak link would dangle once flattening returns.
    pub parent: Option<Arc<MetadataNode>>,
    pub collapsible: Collapsible,
    /// Set by the decoration pass
    pub icon: Option<NodeIcon>,
}

impl MetadataNode {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
        value: MetaValue,
        parent: Option<Arc<MetadataNode>>,
        collapsible: Collapsible,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            description: description.into(),
            value,
            parent,
            collapsible,
            icon: None,
        }
    }

    /// Detached node that only carries a key, used as the parent of collapsed wrappers.
    pub fn placeholder(key: impl Into<String>) -> Self {
        Self::new(key, "", "", MetaValue::Null, None, Collapsible::None)
    }

    pub fn has_children(&self) -> bool {
        self.collapsible == Collapsible::Expanded
    }

    pub fn parent_key(&self) -> Option<&str> {
        self.parent.as_deref().map(|p| p.key.as_str())
    }
}
