//! Error types for ca-core
//!
//! The entity store itself never fails; these errors come from the edges
//! (configuration loading, export I/O, boundary validation).

use thiserror::Error;

/// Main error type for ca-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Result type alias for ca-core
pub type Result<T> = std::result::Result<T, Error>;
