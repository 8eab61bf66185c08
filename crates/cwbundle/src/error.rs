//! Error types for bundle operations.
//!
//! This module provides the main error type [`BundleError`] which wraps
//! the failures that can occur while writing, archiving, validating or
//! rendering a bundle.

use std::io;

use thiserror::Error;

/// The main error type for cwbundle operations.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Blob `{0}` appears more than once in the same write")]
    DuplicateBlob(String),

    #[error("Blob name `{0}` is not a plain file name")]
    InvalidBlobName(String),

    #[error("Archive already contains an entry named `{0}`")]
    EntryExists(String),

    #[error("Archive has no entry named `{0}`")]
    MissingEntry(String),

    #[error("Validation of `{name}` failed: {message}")]
    Validation { name: String, message: String },

    #[error("Render error: {0}")]
    Render(String),
}

impl BundleError {
    /// Create a new `Validation` error for the named blob.
    pub fn validation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            name: name.into(),
            message: message.into(),
        }
    }
}
