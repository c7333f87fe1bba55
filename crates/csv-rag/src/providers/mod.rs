//! Provider abstractions for blob storage, file records and completions
//!
//! Trait-based seams let the service run against SQLite and the local
//! filesystem with either Gemini or Ollama answering queries.

pub mod blob_store;
pub mod gemini;
pub mod llm;
pub mod local;
pub mod ollama;
pub mod record_store;

pub use blob_store::BlobStoreProvider;
pub use gemini::GeminiClient;
pub use llm::CompletionProvider;
pub use local::LocalBlobStore;
pub use ollama::OllamaLlm;
pub use record_store::RecordStore;

use std::sync::Arc;

use crate::config::{CompletionBackend, LlmConfig};
use crate::error::Result;

/// Build the completion provider selected by configuration
pub fn completion_provider(config: &LlmConfig) -> Result<Arc<dyn CompletionProvider>> {
    Ok(match config.provider {
        CompletionBackend::Gemini => Arc::new(GeminiClient::new(config)?),
        CompletionBackend::Ollama => Arc::new(OllamaLlm::new(config)?),
    })
}
