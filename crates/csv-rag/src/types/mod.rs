//! Core types for the CSV service

pub mod file_record;
pub mod query;
pub mod response;
pub mod row;

pub use file_record::{FileRecord, FileSummary};
pub use query::QueryRequest;
pub use response::{FileListResponse, MessageResponse, QueryResponse, UploadResponse};
pub use row::{CellValue, Row};
