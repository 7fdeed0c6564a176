//! Icon and keyword-color decoration for flattened nodes.

use crate::config::constants::DEFAULT_CATEGORY_ICON;
use crate::config::Config;
use crate::metadata::node::{MetadataNode, NodeIcon};

/// Category used for icon lookup: the parent's key when labels are shown or a parent
/// exists, else the node's own key. Falls back to the node's key when that is empty and
/// the node has a description. Lower-cased; `None` when nothing usable remains.
pub fn category_of(node: &MetadataNode, show_labels: bool) -> Option<String> {
    let mut category = if show_labels || node.parent.is_some() {
        node.parent_key().map(str::to_lowercase)
    } else {
        Some(node.key.to_lowercase())
    };

    if category.as_deref().map_or(true, str::is_empty) && !node.description.is_empty() {
        category = Some(node.key.to_lowercase());
    }

    category.filter(|c| !c.is_empty())
}

/// Attach an icon (and keyword color) to `node` according to `config`.
pub fn decorate(node: &mut MetadataNode, config: &Config) {
    let show_labels = config.meta_category_names_enabled;
    let category = match category_of(node, show_labels) {
        Some(category) => category,
        None => return,
    };
    if !config.meta_category_icons_enabled {
        return;
    }

    let icon = config
        .meta_categories
        .get(&category)
        .cloned()
        .unwrap_or_else(|| DEFAULT_CATEGORY_ICON.to_string());

    let keyword = if show_labels {
        node.description.to_lowercase()
    } else {
        node.label.to_lowercase()
    };
    let color = if !keyword.is_empty() && config.meta_keyword_show_in_metadata_view {
        config.meta_keyword_colors.get(&keyword).cloned()
    } else {
        None
    };

    node.icon = Some(NodeIcon { id: icon, color });
}
