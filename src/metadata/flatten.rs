//! Front-matter flattening.
//!
//! Rules:
//! - null yields nothing
//! - a sequence flattens each item in order under the same parent; lists add no level
//! - a single-key mapping, when category names are hidden, is skipped and its value is
//!   flattened with the key as the parent
//! - any other mapping yields one node per entry; composite values are expandable
//! - a scalar yields one keyless node
//!
//! With category names shown the key is the label and the value the description;
//! otherwise the value is the label and the description is empty.

use crate::config::Config;
use crate::metadata::node::{Collapsible, MetadataNode};
use crate::metadata::value::MetaValue;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlattenOptions {
    /// Show property names as labels
    pub show_labels: bool,
}

impl From<&Config> for FlattenOptions {
    fn from(config: &Config) -> Self {
        Self {
            show_labels: config.meta_category_names_enabled,
        }
    }
}

pub fn parse_object_tree(
    value: &MetaValue,
    parent: Option<&Arc<MetadataNode>>,
    options: &FlattenOptions,
) -> Vec<MetadataNode> {
    match value {
        MetaValue::Null => Vec::new(),
        MetaValue::Sequence(items) => items
            .iter()
            .flat_map(|item| parse_object_tree(item, parent, options))
            .collect(),
        MetaValue::Mapping(entries) if !options.show_labels && entries.len() == 1 => {
            let (key, inner) = &entries[0];
            let wrapper = Arc::new(MetadataNode::placeholder(key.as_str()));
            parse_object_tree(inner, Some(&wrapper), options)
        }
        MetaValue::Mapping(entries) => entries
            .iter()
            .map(|(key, inner)| entry_node(key, inner, parent, options))
            .collect(),
        MetaValue::Scalar(_) => {
            let text = value.display_text();
            let (label, description) = if options.show_labels {
                (String::new(), text)
            } else {
                (text, String::new())
            };
            vec![MetadataNode::new(
                "",
                label,
                description,
                value.clone(),
                parent.cloned(),
                Collapsible::None,
            )]
        }
    }
}

fn entry_node(
    key: &str,
    value: &MetaValue,
    parent: Option<&Arc<MetadataNode>>,
    options: &FlattenOptions,
) -> MetadataNode {
    if value.is_composite() {
        return MetadataNode::new(
            key,
            key,
            "",
            value.clone(),
            parent.cloned(),
            Collapsible::Expanded,
        );
    }

    let text = value.display_text();
    let (label, description) = if options.show_labels {
        (key.to_string(), text)
    } else {
        (text, String::new())
    };
    MetadataNode::new(
        key,
        label,
        description,
        value.clone(),
        parent.cloned(),
        Collapsible::None,
    )
}
