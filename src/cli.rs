//! CLI domain: parse, route, output, and presentation only.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, ConfigCommands, FlagCommands};
pub use presentation::{format_config_json, format_config_text, format_tree_json, format_tree_text};
pub use route::RunContext;
