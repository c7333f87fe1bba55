//! SQLite database for persistent file record storage
//!
//! Rows are stored as a JSON array next to the file metadata, so a record is
//! written and removed with a single statement.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::RecordStore;
use crate::types::{FileRecord, FileSummary, Row};

/// SQLite-based file record database
pub struct FileRecordDb {
    conn: Arc<Mutex<Connection>>,
}

impl FileRecordDb {
    /// Create or open the database at the given path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let conn = Connection::open(path)
            .map_err(|e| Error::storage(format!("Failed to open database: {}", e)))?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.migrate()?;
        Ok(db)
    }

    /// Create an in-memory database
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::storage(format!("Failed to open in-memory database: {}", e)))?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.migrate()?;
        Ok(db)
    }

    /// Run database migrations
    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
        "#).map_err(|e| Error::storage(format!("Failed to set pragmas: {}", e)))?;

        conn.execute_batch(r#"
            CREATE TABLE IF NOT EXISTS csv_files (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                file_id TEXT NOT NULL UNIQUE,
                file_name TEXT NOT NULL,
                file_path TEXT NOT NULL,
                document TEXT NOT NULL,
                uploaded_at TEXT NOT NULL
            );
        "#)
        .map_err(|e| Error::storage(format!("Failed to run migrations: {}", e)))?;

        tracing::info!("Database migrations complete");
        Ok(())
    }

    /// Number of stored records
    pub fn count(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM csv_files", [], |row| row.get(0))
            .map_err(|e| Error::storage(format!("Failed to count records: {}", e)))?;
        Ok(count as usize)
    }
}

impl RecordStore for FileRecordDb {
    fn insert(&self, record: &FileRecord) -> Result<()> {
        let document = serde_json::to_string(&record.rows)?;
        let conn = self.conn.lock();

        conn.execute(
            r#"
            INSERT INTO csv_files (file_id, file_name, file_path, document, uploaded_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                record.file_id,
                record.file_name,
                record.file_path,
                document,
                record.uploaded_at.to_rfc3339(),
            ],
        ).map_err(|e| Error::storage(format!("Failed to insert file record: {}", e)))?;

        Ok(())
    }

    fn find(&self, file_id: &str) -> Result<Option<FileRecord>> {
        let conn = self.conn.lock();

        let mut stmt = conn.prepare(
            "SELECT file_id, file_name, file_path, document, uploaded_at FROM csv_files WHERE file_id = ?1"
        ).map_err(|e| Error::storage(format!("Failed to prepare query: {}", e)))?;

        let raw = stmt.query_row(params![file_id], |row| {
            Ok(RawRecord {
                file_id: row.get(0)?,
                file_name: row.get(1)?,
                file_path: row.get(2)?,
                document: row.get(3)?,
                uploaded_at: row.get(4)?,
            })
        }).optional()
        .map_err(|e| Error::storage(format!("Failed to get file record: {}", e)))?;

        raw.map(RawRecord::into_record).transpose()
    }

    fn list(&self) -> Result<Vec<FileSummary>> {
        let conn = self.conn.lock();

        let mut stmt = conn.prepare("SELECT file_id, file_name FROM csv_files ORDER BY seq")
            .map_err(|e| Error::storage(format!("Failed to prepare query: {}", e)))?;

        let summaries = stmt.query_map([], |row| {
            Ok(FileSummary {
                file_id: row.get(0)?,
                file_name: row.get(1)?,
            })
        })
        .map_err(|e| Error::storage(format!("Failed to list file records: {}", e)))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::storage(format!("Failed to read file record: {}", e)))?;

        Ok(summaries)
    }

    fn delete(&self, file_id: &str) -> Result<bool> {
        let conn = self.conn.lock();

        let count = conn.execute(
            "DELETE FROM csv_files WHERE file_id = ?1",
            params![file_id],
        ).map_err(|e| Error::storage(format!("Failed to delete file record: {}", e)))?;

        Ok(count > 0)
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}

/// Columns as read from the table, before decoding
struct RawRecord {
    file_id: String,
    file_name: String,
    file_path: String,
    document: String,
    uploaded_at: String,
}

impl RawRecord {
    fn into_record(self) -> Result<FileRecord> {
        let rows: Vec<Row> = serde_json::from_str(&self.document).map_err(|e| {
            Error::storage(format!("Corrupt document for {}: {}", self.file_id, e))
        })?;

        let uploaded_at = DateTime::parse_from_rfc3339(&self.uploaded_at)
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(FileRecord {
            file_id: self.file_id,
            file_name: self.file_name,
            file_path: self.file_path,
            rows,
            uploaded_at,
        })
    }
}
