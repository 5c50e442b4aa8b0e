//! Error types for loading command tables.

use command_dispatch_core::DefinitionError;
use thiserror::Error;

/// Errors that can occur while loading or converting a table document.
#[derive(Debug, Error)]
pub enum TableError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The file extension is neither JSON nor YAML.
    #[error("unsupported table format: {0}")]
    UnknownFormat(String),

    /// The document declares a format version this crate does not read.
    #[error("unsupported table version: {0}")]
    UnsupportedVersion(String),

    /// Two commands share a declaration key.
    #[error("duplicate command key `{0}`")]
    DuplicateCommand(String),

    /// The document describes an inconsistent configuration.
    #[error("invalid table: {0}")]
    Definition(#[from] DefinitionError),
}

/// Convenience alias for results with [`TableError`].
pub type Result<T> = std::result::Result<T, TableError>;
