//! Setting namespaces, enumerated setting values and the dialogue marker table.

pub const NS_EDIT: &str = "markdown-fiction-writer.edit";
pub const NS_EDIT_DIALOGUE: &str = "markdown-fiction-writer.editDialogue";
pub const NS_EXPORT: &str = "markdown-fiction-writer.export";
pub const NS_VIEW: &str = "markdown-fiction-writer.view";
pub const NS_METADATA: &str = "markdown-fiction-writer.metadata";
pub const NS_TEXT_FORMATTING: &str = "markdown-fiction-writer.textFormatting";
pub const NS_SMART_EDIT: &str = "markdown-fiction-writer.smartEdit";

/// Every namespace read by a reload, in read order.
pub const NAMESPACES: [&str; 7] = [
    NS_EDIT,
    NS_EDIT_DIALOGUE,
    NS_EXPORT,
    NS_VIEW,
    NS_METADATA,
    NS_TEXT_FORMATTING,
    NS_SMART_EDIT,
];

/// Local store key holding the per-workspace override map.
pub const LOCAL_CONFIG_KEY: &str = "config";

pub mod paragraph {
    pub const NEW_ON_ENTER: &str = "Enter";
    pub const NEW_ON_MODIFIER_ENTER: &str = "ModifierEnter";
}

pub mod dialogue {
    pub const EM_DASH: &str = "Em Dash";
    pub const QUOTATION_DASH: &str = "Quotation Dash";
    pub const EN_DASH: &str = "En Dash";
    pub const TWO_HYPHENS: &str = "Two Hyphens";
    pub const DISABLED: &str = "Disabled";
}

pub mod save_dialogue {
    pub const ALWAYS: &str = "Always";
    pub const NEVER: &str = "Never";
}

pub mod paragraph_breaks {
    pub const NONE: &str = "None";
}

pub mod rename_related {
    pub const ASK: &str = "Ask";
}

pub const DEFAULT_OUTPUT_FORMAT: &str = "odt";

/// Color value that means "no color".
pub const COLOR_NONE: &str = "none";

/// Theme color namespace for keyword colors.
pub const COLOR_NAMESPACE: &str = "fictionwriter";

/// Icon used when a category has no configured icon.
pub const DEFAULT_CATEGORY_ICON: &str = "debug-stackframe-dot";

const DIALOGUE_MARKERS: [(&str, &str); 5] = [
    (dialogue::EM_DASH, "\u{2014}"),
    (dialogue::QUOTATION_DASH, "\u{2015}"),
    (dialogue::EN_DASH, "\u{2013}"),
    (dialogue::TWO_HYPHENS, "--"),
    (dialogue::DISABLED, ""),
];

/// Map a configured marker name to its dialogue prefix. Unknown names yield `""`.
pub fn dialogue_prefix(marker: &str) -> &'static str {
    DIALOGUE_MARKERS
        .iter()
        .find(|(name, _)| *name == marker)
        .map(|(_, prefix)| *prefix)
        .unwrap_or("")
}
