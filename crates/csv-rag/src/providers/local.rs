//! Local filesystem blob storage

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

use super::blob_store::BlobStoreProvider;

/// Blob store writing uploads into a single local directory
pub struct LocalBlobStore {
    storage_dir: PathBuf,
}

impl LocalBlobStore {
    /// Create a new local blob store, creating the directory if needed
    pub fn new(storage_dir: impl Into<PathBuf>) -> Result<Self> {
        let storage_dir = storage_dir.into();
        std::fs::create_dir_all(&storage_dir).map_err(|e| {
            Error::storage(format!(
                "Failed to create upload directory {}: {}",
                storage_dir.display(),
                e
            ))
        })?;
        Ok(Self { storage_dir })
    }

    /// Directory blobs are written to
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    fn blob_path(&self, storage_name: &str) -> PathBuf {
        self.storage_dir.join(storage_name)
    }
}

#[async_trait]
impl BlobStoreProvider for LocalBlobStore {
    async fn store(&self, storage_name: &str, data: &[u8]) -> Result<String> {
        let path = self.blob_path(storage_name);

        tokio::fs::write(&path, data).await.map_err(|e| {
            Error::storage(format!("Failed to write {}: {}", path.display(), e))
        })?;

        tracing::debug!("Stored blob {} ({} bytes)", path.display(), data.len());
        Ok(path.to_string_lossy().to_string())
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(|e| Error::storage(format!("Failed to read {}: {}", path, e)))
    }

    async fn delete(&self, path: &str) -> Result<bool> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => {
                tracing::debug!("Deleted blob {}", path);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::storage(format!("Failed to delete {}: {}", path, e))),
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.storage_dir.is_dir())
    }

    fn name(&self) -> &str {
        "local-filesystem"
    }
}
