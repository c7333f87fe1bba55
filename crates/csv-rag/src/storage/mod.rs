//! Storage module for persistent data storage
//!
//! Provides SQLite-based persistence for file records.

mod database;

pub use database::FileRecordDb;
