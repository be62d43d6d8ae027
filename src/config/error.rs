//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors.
///
/// Every variant is fatal before any task runs: a build never starts
/// against a half-resolved configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Json(#[from] serde_json::Error),

    #[error("The `{0}` setting must be specified in staticsite.json")]
    MissingField(&'static str),
}
