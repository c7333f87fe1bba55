//! Test doubles shared by unit tests.
//!
//! Only compiled when running tests.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::providers::{BlobStoreProvider, CompletionProvider, RecordStore};
use crate::storage::FileRecordDb;
use crate::types::{FileRecord, FileSummary};

/// Completion provider returning a fixed reply and recording every prompt
pub struct ScriptedCompletion {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedCompletion {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        self.reply
            .clone()
            .ok_or_else(|| Error::upstream("scripted failure"))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.reply.is_some())
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }
}

/// Record store whose inserts always fail
pub struct ReadOnlyRecordStore {
    inner: FileRecordDb,
}

impl ReadOnlyRecordStore {
    pub fn new() -> Self {
        Self {
            inner: FileRecordDb::in_memory().unwrap(),
        }
    }
}

impl RecordStore for ReadOnlyRecordStore {
    fn insert(&self, _record: &FileRecord) -> Result<()> {
        Err(Error::storage("database is read-only"))
    }

    fn find(&self, file_id: &str) -> Result<Option<FileRecord>> {
        self.inner.find(file_id)
    }

    fn list(&self) -> Result<Vec<FileSummary>> {
        self.inner.list()
    }

    fn delete(&self, file_id: &str) -> Result<bool> {
        self.inner.delete(file_id)
    }

    fn name(&self) -> &str {
        "read-only"
    }
}

/// Blob store whose writes always fail
pub struct FullDiskBlobStore;

#[async_trait]
impl BlobStoreProvider for FullDiskBlobStore {
    async fn store(&self, storage_name: &str, _data: &[u8]) -> Result<String> {
        Err(Error::storage(format!("No space left on device: {}", storage_name)))
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        Err(Error::storage(format!("Failed to read {}", path)))
    }

    async fn delete(&self, _path: &str) -> Result<bool> {
        Ok(false)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }

    fn name(&self) -> &str {
        "full-disk"
    }
}

/// Record store that rejects every call
pub struct UnavailableRecordStore;

impl RecordStore for UnavailableRecordStore {
    fn insert(&self, _record: &FileRecord) -> Result<()> {
        Err(Error::storage("connection refused"))
    }

    fn find(&self, _file_id: &str) -> Result<Option<FileRecord>> {
        Err(Error::storage("connection refused"))
    }

    fn list(&self) -> Result<Vec<FileSummary>> {
        Err(Error::storage("connection refused"))
    }

    fn delete(&self, _file_id: &str) -> Result<bool> {
        Err(Error::storage("connection refused"))
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}
