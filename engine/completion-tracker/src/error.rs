//! Error types for the completion tracker

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Errors that can occur while reading or appending the marker file
#[derive(Error, Debug)]
pub enum TrackerError {
    /// I/O errors on the marker file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line in the marker file is not a gameweek id
    #[error("Marker file {path:?} corrupted at line {line}: {content:?}")]
    Corruption { path: PathBuf, line: usize, content: String },
}

impl TrackerError {
    /// Create a new corruption error
    pub fn corruption(path: impl Into<PathBuf>, line: usize, content: impl Into<String>) -> Self {
        Self::Corruption { path: path.into(), line, content: content.into() }
    }
}
