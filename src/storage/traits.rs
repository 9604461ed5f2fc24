//! Storage traits and error types
//!
//! This module defines the trait interface for the place finished documents
//! are written to, and associated error types.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Writes are whole-document overwrites. There is no partial-write recovery:
/// a crash mid-write may leave a truncated file behind.
pub trait Storage {
    /// Writes `contents` to `path`, replacing whatever was there
    ///
    /// # Arguments
    ///
    /// * `contents` - The complete serialized document
    /// * `path` - Destination file; created if absent
    fn write(&self, contents: &str, path: &Path) -> StorageResult<()>;
}

impl<T: Storage + ?Sized> Storage for &T {
    fn write(&self, contents: &str, path: &Path) -> StorageResult<()> {
        (**self).write(contents, path)
    }
}
