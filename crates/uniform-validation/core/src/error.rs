// File: src/error.rs
// Purpose: Configuration errors for rule and catalog loading

use thiserror::Error;

/// Errors raised while building rules or catalogs.
///
/// Validation failures are never reported through this type; they are
/// [`ValidationOutcome::Invalid`](crate::ValidationOutcome::Invalid) values.
#[derive(Debug, Error)]
pub enum UniformError {
    #[error("Unknown validator: {0}")]
    UnknownValidator(String),

    #[error("Unknown message key: {0}")]
    UnknownMessageKey(String),

    #[error("Failed to parse message catalog: {0}")]
    Catalog(#[from] toml::de::Error),

    #[error("Failed to parse rules: {0}")]
    Rules(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, UniformError>;
