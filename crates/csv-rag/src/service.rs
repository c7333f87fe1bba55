//! File service: upload, listing, preview, query and deletion
//!
//! Every operation is a single pass over the stores; there is no locking
//! beyond what each store call provides.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::ingestion::IngestPipeline;
use crate::providers::{BlobStoreProvider, CompletionProvider, RecordStore};
use crate::types::{FileRecord, FileSummary, Row};

/// Number of rows returned by [`FileService::preview`]
pub const PREVIEW_ROWS: usize = 5;

/// Operations over stored CSV files
#[derive(Clone)]
pub struct FileService {
    pipeline: IngestPipeline,
    blobs: Arc<dyn BlobStoreProvider>,
    records: Arc<dyn RecordStore>,
    completion: Arc<dyn CompletionProvider>,
}

impl FileService {
    /// Create a service over the given providers
    pub fn new(
        blobs: Arc<dyn BlobStoreProvider>,
        records: Arc<dyn RecordStore>,
        completion: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self {
            pipeline: IngestPipeline::new(Arc::clone(&blobs), Arc::clone(&records)),
            blobs,
            records,
            completion,
        }
    }

    /// Ingest an uploaded file
    pub async fn upload(&self, original_filename: &str, data: &[u8]) -> Result<FileRecord> {
        self.pipeline.ingest(original_filename, data).await
    }

    /// List identifiers and names of all stored files
    pub fn list_files(&self) -> Result<Vec<FileSummary>> {
        self.records.list().map_err(|e| {
            tracing::error!("Listing files failed: {}", e);
            Error::storage("Failed to retrieve files")
        })
    }

    /// First rows of a stored file
    pub fn preview(&self, file_id: &str) -> Result<Vec<Row>> {
        let record = self.find(file_id)?;
        Ok(record.head(PREVIEW_ROWS).to_vec())
    }

    /// Ask a question about a stored file
    ///
    /// The full table and the question go to the completion provider in one
    /// request; its reply is returned unchanged.
    pub async fn query(&self, file_id: &str, question: &str) -> Result<String> {
        let record = self.find(file_id)?;
        let prompt = PromptBuilder::build_query_prompt(&record.rows, question);

        tracing::info!(
            "Query on {} ({} rows, {} prompt bytes) via {}/{}",
            file_id,
            record.row_count(),
            prompt.len(),
            self.completion.name(),
            self.completion.model()
        );

        self.completion.complete(&prompt).await
    }

    /// Delete a stored file and its blob
    pub async fn delete(&self, file_id: &str) -> Result<()> {
        let record = self.find(file_id)?;

        if !self.records.delete(file_id)? {
            return Err(Error::NotFound(file_id.to_string()));
        }

        match self.blobs.delete(&record.file_path).await {
            Ok(true) => {}
            Ok(false) => tracing::warn!("Blob {} was already missing", record.file_path),
            Err(e) => tracing::warn!("Failed to remove blob {}: {}", record.file_path, e),
        }

        tracing::info!("Deleted {} ('{}')", file_id, record.file_name);
        Ok(())
    }

    /// Completion provider in use
    pub fn completion(&self) -> &Arc<dyn CompletionProvider> {
        &self.completion
    }

    /// Blob store in use
    pub fn blobs(&self) -> &Arc<dyn BlobStoreProvider> {
        &self.blobs
    }

    /// Record store in use
    pub fn records(&self) -> &Arc<dyn RecordStore> {
        &self.records
    }

    fn find(&self, file_id: &str) -> Result<FileRecord> {
        self.records
            .find(file_id)?
            .ok_or_else(|| Error::NotFound(file_id.to_string()))
    }
}
