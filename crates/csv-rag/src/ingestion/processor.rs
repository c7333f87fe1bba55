//! Ingestion pipeline: store blob, parse, persist record

use std::sync::Arc;
use uuid::Uuid;

use crate::error::Result;
use crate::providers::{BlobStoreProvider, RecordStore};
use crate::types::file_record::storage_name;
use crate::types::FileRecord;

use super::parser::CsvParser;

/// Ingestion pipeline for uploaded CSV files
///
/// A record is inserted only after the blob is written and parsed. When a
/// later step fails, the blob written earlier is removed again.
#[derive(Clone)]
pub struct IngestPipeline {
    blobs: Arc<dyn BlobStoreProvider>,
    records: Arc<dyn RecordStore>,
}

impl IngestPipeline {
    /// Create a pipeline over the given stores
    pub fn new(blobs: Arc<dyn BlobStoreProvider>, records: Arc<dyn RecordStore>) -> Self {
        Self { blobs, records }
    }

    /// Ingest one uploaded file
    pub async fn ingest(&self, original_filename: &str, data: &[u8]) -> Result<FileRecord> {
        let file_id = Uuid::new_v4().to_string();
        let blob_name = storage_name(&file_id, original_filename);

        let file_path = self.blobs.store(&blob_name, data).await?;

        let rows = match CsvParser::parse(original_filename, data) {
            Ok(rows) => rows,
            Err(e) => {
                self.discard_blob(&file_path).await;
                return Err(e);
            }
        };

        let record = FileRecord::new(
            file_id,
            original_filename.to_string(),
            file_path,
            rows,
        );

        if let Err(e) = self.records.insert(&record) {
            self.discard_blob(&record.file_path).await;
            return Err(e);
        }

        tracing::info!(
            "Ingested '{}' as {} ({} bytes, {} rows)",
            record.file_name,
            record.file_id,
            data.len(),
            record.row_count()
        );

        Ok(record)
    }

    async fn discard_blob(&self, path: &str) {
        if let Err(e) = self.blobs.delete(path).await {
            tracing::warn!("Failed to remove blob {} after aborted ingest: {}", path, e);
        }
    }
}
