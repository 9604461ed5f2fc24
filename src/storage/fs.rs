//! Filesystem storage backend

use crate::storage::traits::{Storage, StorageError, StorageResult};
use std::path::Path;

/// Writes documents straight to the local filesystem
///
/// Writes block the calling thread. A run writes a handful of small
/// documents after all fetching is done, so callers on the async runtime
/// invoke it directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl FsStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Storage for FsStorage {
    fn write(&self, contents: &str, path: &Path) -> StorageResult<()> {
        if path.as_os_str().is_empty() {
            return Err(StorageError::InvalidPath("empty path".to_string()));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(path, contents).map_err(|source| StorageError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!("Wrote {} bytes to {}", contents.len(), path.display());

        Ok(())
    }
}
