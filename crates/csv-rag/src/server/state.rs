//! Application state for the CSV server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::providers::{self, LocalBlobStore};
use crate::service::FileService;
use crate::storage::FileRecordDb;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// File operations over the configured stores
    service: FileService,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create new application state from configuration
    pub async fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing CSV application state...");

        let records = Arc::new(FileRecordDb::new(&config.storage.database_path)?);
        tracing::info!(
            "Document store opened at {} ({} files)",
            config.storage.database_path.display(),
            records.count()?
        );

        let blobs = Arc::new(LocalBlobStore::new(&config.storage.upload_dir)?);
        tracing::info!("Blob store ready at {}", config.storage.upload_dir.display());

        let completion = providers::completion_provider(&config.llm)?;
        tracing::info!(
            "Completion provider initialized ({}: {})",
            completion.name(),
            completion.model()
        );

        let service = FileService::new(blobs, records, completion);
        Ok(Self::from_service(config, service))
    }

    /// Create state around an already-built service
    ///
    /// The state starts not ready; the server marks it ready once listening.
    pub fn from_service(config: RagConfig, service: FileService) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                service,
                ready: RwLock::new(false),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the file service
    pub fn service(&self) -> &FileService {
        &self.inner.service
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
