//! Error types for Cobertura

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoberturaError {
    // Source errors
    #[error("Record source not found at {path}")]
    SourceNotFound { path: PathBuf },

    #[error("Failed to read record source {path}: {reason}")]
    SourceRead { path: PathBuf, reason: String },

    #[error("Required column '{column}' missing from {source_name}")]
    MissingColumn { source_name: String, column: String },

    #[error("No {population} source configured")]
    SourceMissing { population: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Developer access
    #[error("Developer key rejected")]
    Unauthorized,

    #[error("Developer access is not configured. Set dev_key or COBERTURA_DEV_KEY")]
    DevAccessDisabled,

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, CoberturaError>;
