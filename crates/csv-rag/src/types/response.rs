//! Response types for the HTTP API

use serde::{Deserialize, Serialize};

use super::{FileRecord, FileSummary};

/// Response for a successful upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub file_id: String,
    pub file_name: String,
    pub message: String,
}

impl From<&FileRecord> for UploadResponse {
    fn from(record: &FileRecord) -> Self {
        Self {
            file_id: record.file_id.clone(),
            file_name: record.file_name.clone(),
            message: "Upload successful".to_string(),
        }
    }
}

/// Response for file listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileListResponse {
    pub files: Vec<FileSummary>,
}

/// Response for a query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Completion text, verbatim
    pub response: String,
}

/// Plain message response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
