//! Completion provider trait for answering questions over CSV data

use async_trait::async_trait;
use crate::error::Result;

/// Trait for text-in, text-out completion services
///
/// Implementations:
/// - `GeminiClient`: Google Generative Language API (gemini-1.5-flash)
/// - `OllamaLlm`: Local Ollama server
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Complete a prompt, returning the model's text verbatim
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
