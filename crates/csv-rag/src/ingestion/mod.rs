//! CSV ingestion: parsing and the upload pipeline

mod parser;
mod processor;

pub use parser::CsvParser;
pub use processor::IngestPipeline;
