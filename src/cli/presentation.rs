//! CLI presentation: snapshot tables and metadata tree rendering.

use crate::config::{Color, Config};
use crate::error::ApiError;
use crate::metadata::{MetadataNode, MetadataTreeProvider};
use comfy_table::Table;
use owo_colors::{AnsiColors, OwoColorize};
use serde_json::{json, Value};
use std::sync::Arc;

pub fn format_config_text(config: &Config, key: Option<&str>) -> Result<String, ApiError> {
    let fields = config_fields(config)?;
    if let Some(key) = key {
        return fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| render_value(v))
            .ok_or_else(|| ApiError::ConfigError(format!("Unknown configuration key: {}", key)));
    }

    let mut table = Table::new();
    table.set_header(vec!["Setting", "Value"]);
    for (k, v) in &fields {
        table.add_row(vec![k.clone(), render_value(v)]);
    }
    Ok(table.to_string())
}

pub fn format_config_json(config: &Config, key: Option<&str>) -> Result<String, ApiError> {
    let value = match key {
        Some(key) => config
            .get(key)
            .ok_or_else(|| ApiError::ConfigError(format!("Unknown configuration key: {}", key)))?,
        None => serde_json::to_value(config)
            .map_err(|e| ApiError::ConfigError(e.to_string()))?,
    };
    serde_json::to_string_pretty(&value).map_err(|e| ApiError::ConfigError(e.to_string()))
}

fn config_fields(config: &Config) -> Result<Vec<(String, Value)>, ApiError> {
    match serde_json::to_value(config).map_err(|e| ApiError::ConfigError(e.to_string()))? {
        Value::Object(fields) => Ok(fields.into_iter().collect()),
        _ => Err(ApiError::ConfigError(
            "configuration did not serialize to an object".to_string(),
        )),
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) if s.is_empty() => "\"\"".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Indented tree; icons become a bullet tinted with the keyword color.
pub fn format_tree_text(provider: &MetadataTreeProvider, use_color: bool) -> String {
    let mut lines = Vec::new();
    for node in provider.get_children(None) {
        render_node(provider, &node, 0, use_color, &mut lines);
    }
    if lines.is_empty() {
        return "No metadata.".to_string();
    }
    lines.join("\n")
}

fn render_node(
    provider: &MetadataTreeProvider,
    node: &Arc<MetadataNode>,
    depth: usize,
    use_color: bool,
    lines: &mut Vec<String>,
) {
    let indent = "  ".repeat(depth);
    let bullet = match &node.icon {
        Some(icon) => match (&icon.color, use_color) {
            (Some(color), true) => "●".color(ansi_color(color)).to_string(),
            _ => "●".to_string(),
        },
        None => "·".to_string(),
    };

    let mut line = format!("{}{} {}", indent, bullet, node.label);
    if !node.description.is_empty() {
        if use_color {
            line.push_str(&format!("  {}", node.description.dimmed()));
        } else {
            line.push_str(&format!("  {}", node.description));
        }
    }
    lines.push(line);

    if node.has_children() {
        for child in provider.get_children(Some(node)) {
            render_node(provider, &child, depth + 1, use_color, lines);
        }
    }
}

pub fn format_tree_json(provider: &MetadataTreeProvider) -> String {
    let rows: Vec<Value> = provider
        .get_children(None)
        .iter()
        .map(|node| node_json(provider, node))
        .collect();
    serde_json::to_string_pretty(&json!({ "nodes": rows })).unwrap_or_else(|_| "{}".to_string())
}

fn node_json(provider: &MetadataTreeProvider, node: &Arc<MetadataNode>) -> Value {
    let children: Vec<Value> = if node.has_children() {
        provider
            .get_children(Some(node))
            .iter()
            .map(|child| node_json(provider, child))
            .collect()
    } else {
        Vec::new()
    };
    json!({
        "key": node.key,
        "label": node.label,
        "description": node.description,
        "icon": node.icon.as_ref().map(|i| i.id.clone()),
        "color": node.icon.as_ref().and_then(|i| i.color.as_ref()).map(|c| c.id().to_string()),
        "children": children,
    })
}

/// Closest terminal color for a theme color name.
fn ansi_color(color: &Color) -> AnsiColors {
    match color.name() {
        "red" => AnsiColors::Red,
        "green" => AnsiColors::Green,
        "blue" => AnsiColors::Blue,
        "yellow" => AnsiColors::Yellow,
        "orange" => AnsiColors::BrightRed,
        "purple" | "magenta" => AnsiColors::Magenta,
        "pink" => AnsiColors::BrightMagenta,
        "teal" | "cyan" => AnsiColors::Cyan,
        "gray" | "grey" => AnsiColors::BrightBlack,
        _ => AnsiColors::White,
    }
}
