//! Error types for treeshalib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while fingerprinting a source tree
#[derive(Error, Debug)]
pub enum TreeshaError {
    /// A directory below a root could not be listed
    #[error("failed to list directory '{path}': {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to read a file's content or metadata
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Output file could not be created
    #[error("failed to open output '{path}': {source}")]
    OutputOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Writing to the output destination failed
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// Serializing the JSON report failed
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file is missing or malformed
    #[error("invalid configuration '{path}': {message}")]
    Config { path: PathBuf, message: String },

    /// Root argument could not be parsed
    #[error("invalid root '{0}': expected PATH or PATH=LABEL")]
    InvalidRoot(String),
}

impl TreeshaError {
    /// Whether this error only abandons the current root.
    ///
    /// Output and configuration failures end the whole run.
    pub fn is_root_scoped(&self) -> bool {
        matches!(
            self,
            TreeshaError::DirectoryUnreadable { .. } | TreeshaError::FileRead { .. }
        )
    }
}
