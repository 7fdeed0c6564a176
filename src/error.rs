//! Error types for settings resolution and metadata projection.

use thiserror::Error;

/// Errors raised by the settings and local override stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed store file {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("Settings source error: {0}")]
    Settings(String),
}

/// Errors surfaced by the public services.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration is not set: reload() has not run yet")]
    NotConfigured,

    #[error("Invalid local override for '{key}': {reason}")]
    InvalidOverride { key: String, reason: String },

    #[error("Storage error: {0}")]
    StoreError(#[from] StoreError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Editor host error: {0}")]
    HostError(String),

    #[error("Invalid metadata document: {0}")]
    InvalidMetadata(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<config::ConfigError> for StoreError {
    fn from(err: config::ConfigError) -> Self {
        StoreError::Settings(err.to_string())
    }
}
