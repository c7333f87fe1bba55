//! File record types for uploaded CSV files

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Row;

/// Record of an ingested CSV file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Unique file ID (UUID v4, hyphenated)
    pub file_id: String,
    /// Original filename as uploaded
    pub file_name: String,
    /// Location of the stored blob
    pub file_path: String,
    /// Parsed rows in source order
    pub rows: Vec<Row>,
    /// When the file was ingested
    pub uploaded_at: DateTime<Utc>,
}

impl FileRecord {
    /// Create a new record stamped with the current time
    pub fn new(file_id: String, file_name: String, file_path: String, rows: Vec<Row>) -> Self {
        Self {
            file_id,
            file_name,
            file_path,
            rows,
            uploaded_at: Utc::now(),
        }
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// First `n` rows in stored order
    pub fn head(&self, n: usize) -> &[Row] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Listing projection of this record
    pub fn summary(&self) -> FileSummary {
        FileSummary {
            file_id: self.file_id.clone(),
            file_name: self.file_name.clone(),
        }
    }
}

/// Identifier and display name of a stored file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    pub file_id: String,
    pub file_name: String,
}

/// Extension of `filename` including the leading dot, or `""` if none
///
/// Only the final path component is considered, and a name made of a single
/// leading dot segment (such as `.csv`) has no extension.
pub fn file_extension(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let stem_start = base.len() - base.trim_start_matches('.').len();

    match base[stem_start..].rfind('.') {
        Some(idx) => base[stem_start + idx..].to_string(),
        None => String::new(),
    }
}

/// Storage filename for a blob: `{file_id}{extension}`
pub fn storage_name(file_id: &str, original_filename: &str) -> String {
    format!("{}{}", file_id, file_extension(original_filename))
}
