//! Blob store provider trait for storing raw uploaded files

use async_trait::async_trait;
use crate::error::Result;

/// Trait for raw file storage
///
/// Implementations:
/// - `LocalBlobStore`: Local filesystem
#[async_trait]
pub trait BlobStoreProvider: Send + Sync {
    /// Store bytes under `storage_name`
    ///
    /// Returns the storage path
    async fn store(&self, storage_name: &str, data: &[u8]) -> Result<String>;

    /// Read back the bytes stored at `path`
    async fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Delete the blob at `path`
    ///
    /// Returns `false` if nothing was stored there
    async fn delete(&self, path: &str) -> Result<bool>;

    /// Check if the provider is healthy
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
