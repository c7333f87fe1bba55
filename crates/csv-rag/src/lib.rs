//! csv-rag: CSV upload service with natural-language queries
//!
//! Uploaded CSV files are kept as blobs on disk and parsed into rows stored
//! in SQLite. Files can be listed, previewed and deleted, and questions about
//! a file are answered by sending its full contents to an LLM (Gemini or
//! Ollama).

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod server;
pub mod service;
pub mod storage;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use service::FileService;
pub use types::{
    file_record::{FileRecord, FileSummary},
    query::QueryRequest,
    response::{QueryResponse, UploadResponse},
    row::{CellValue, Row},
};
