//! Error types for h5lens.
//!
//! This module provides a unified error handling approach using `thiserror`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for h5lens operations.
pub type Result<T> = std::result::Result<T, ViewerError>;

/// Errors that can occur in h5lens.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// The file is unreadable or not a valid container.
    #[error("Failed to open {path}: {message}")]
    Open { path: PathBuf, message: String },

    /// A node path no longer matches the file contents.
    #[error("Cannot resolve node path: {path}")]
    Resolution { path: String },

    /// A byte-string attribute is not valid UTF-8.
    #[error("Attribute '{name}' holds {len} bytes that are not valid UTF-8")]
    Decode { name: String, len: usize },

    /// Failure reported by the storage backend.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Dataset element type the viewer cannot read.
    #[error("Unsupported data type: {0}")]
    UnsupportedType(String),

    /// Dataset shape that cannot be decoded as an image.
    #[error("Cannot decode image of shape {0:?}")]
    UnsupportedImage(Vec<usize>),

    /// File whose extension is not one of the HDF extensions.
    #[error("Unsupported file format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// Failed to access clipboard.
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] arboard::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ViewerError {
    /// Create an Open error.
    pub fn open(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Open {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create a Resolution error.
    pub fn resolution(path: impl Into<String>) -> Self {
        Self::Resolution { path: path.into() }
    }

    /// Create an UnsupportedFormat error.
    pub fn unsupported_format(path: impl Into<PathBuf>) -> Self {
        Self::UnsupportedFormat { path: path.into() }
    }
}

impl From<netcdf::Error> for ViewerError {
    fn from(err: netcdf::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
