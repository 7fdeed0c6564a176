//! CLI output: error mapping from domain errors to the CLI surface.

use crate::error::ApiError;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::InvalidOverride { key, reason } => format!(
            "Cannot set '{}': {}\nRun `fiction-writer config show` to list keys and their types.",
            key, reason
        ),
        other => other.to_string(),
    }
}
