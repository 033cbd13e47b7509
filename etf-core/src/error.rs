// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for event-to-files

use thiserror::Error;

/// Result type alias
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Main error type
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Unsupported event: {0}")]
    UnsupportedEvent(String),

    #[error("Failed to read directory {path}: {message}")]
    EntryRead { path: String, message: String },

    #[error("Failed to materialize file {path}: {message}")]
    FileMaterialize { path: String, message: String },

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Callback dropped before settling: {0}")]
    CallbackDropped(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    pub fn entry_read(path: impl Into<String>, message: impl Into<String>) -> Self {
        ExtractError::EntryRead { path: path.into(), message: message.into() }
    }

    pub fn file_materialize(path: impl Into<String>, message: impl Into<String>) -> Self {
        ExtractError::FileMaterialize { path: path.into(), message: message.into() }
    }

    /// Whether the error was raised by the host while walking entries
    pub fn is_traversal_failure(&self) -> bool {
        matches!(
            self,
            ExtractError::EntryRead { .. }
                | ExtractError::FileMaterialize { .. }
                | ExtractError::CallbackDropped(_)
        )
    }

    /// Full path of the entry that failed, when known
    pub fn path(&self) -> Option<&str> {
        match self {
            ExtractError::EntryRead { path, .. }
            | ExtractError::FileMaterialize { path, .. }
            | ExtractError::NotAFile(path)
            | ExtractError::NotADirectory(path) => Some(path),
            _ => None,
        }
    }
}
