//! Document store trait for persisted file records

use crate::error::Result;
use crate::types::{FileRecord, FileSummary};

/// Persistent mapping from file id to [`FileRecord`]
///
/// Each call is atomic on its own; nothing spans calls.
///
/// Implementations:
/// - `FileRecordDb`: SQLite
pub trait RecordStore: Send + Sync {
    /// Insert a new record
    fn insert(&self, record: &FileRecord) -> Result<()>;

    /// Find a record by file id
    fn find(&self, file_id: &str) -> Result<Option<FileRecord>>;

    /// Identifiers and names of all records, in insertion order
    fn list(&self) -> Result<Vec<FileSummary>>;

    /// Delete a record; returns `false` if it did not exist
    fn delete(&self, file_id: &str) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
