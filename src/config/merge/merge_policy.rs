//! Merge rules: local overrides are applied last and win on key collisions.

use crate::config::Config;
use crate::error::ApiError;
use serde_json::{Map, Value};
use tracing::warn;

/// Overlay every override onto `base`. Overrides whose value does not fit the typed
/// field are skipped with a warning; the rest still apply.
pub fn overlay(base: Config, overrides: &Map<String, Value>) -> Config {
    let mut merged = base;
    for (key, value) in overrides {
        match apply_override(&merged, key, value.clone()) {
            Ok(next) => merged = next,
            Err(e) => warn!(key = %key, error = %e, "Skipping local override"),
        }
    }
    merged
}

/// Return a copy of `config` with one field replaced. Derived fields are left as they
/// are. Unknown keys land in `Config::extra`.
pub fn apply_override(config: &Config, key: &str, value: Value) -> Result<Config, ApiError> {
    let invalid = |reason: String| ApiError::InvalidOverride {
        key: key.to_string(),
        reason,
    };

    let mut fields = match serde_json::to_value(config).map_err(|e| invalid(e.to_string()))? {
        Value::Object(fields) => fields,
        _ => return Err(invalid("snapshot did not serialize to an object".to_string())),
    };
    fields.insert(key.to_string(), value);

    let mut next: Config =
        serde_json::from_value(Value::Object(fields)).map_err(|e| invalid(e.to_string()))?;
    next.change_event = config.change_event.clone();
    Ok(next)
}
