//! Configuration for the CSV service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable naming an optional TOML config file
pub const CONFIG_PATH_ENV: &str = "CSV_RAG_CONFIG";

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Blob and document storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Completion provider configuration
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 100MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 100 * 1024 * 1024, // 100MB
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory uploaded blobs are written to
    pub upload_dir: PathBuf,
    /// SQLite database holding file records
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let database_path = dirs::data_local_dir()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
            .join("csv-rag")
            .join("csv_rag.db");

        Self {
            upload_dir: PathBuf::from("uploaded"),
            database_path,
        }
    }
}

/// Completion backend selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CompletionBackend {
    /// Google Generative Language API
    #[default]
    Gemini,
    /// Local Ollama server
    Ollama,
}

impl std::str::FromStr for CompletionBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            other => Err(Error::Config(format!("Unknown LLM provider: {}", other))),
        }
    }
}

/// Completion provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Which backend answers queries
    pub provider: CompletionBackend,
    /// API key (required for Gemini)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model name
    pub model: String,
    /// Base URL of the API
    pub base_url: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: CompletionBackend::Gemini,
            api_key: None,
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            temperature: 0.2,
            timeout_secs: 120,
        }
    }
}

impl LlmConfig {
    /// Defaults for a local Ollama server
    pub fn ollama() -> Self {
        Self {
            provider: CompletionBackend::Ollama,
            api_key: None,
            model: "llama3.2:3b".to_string(),
            base_url: "http://localhost:11434".to_string(),
            temperature: 0.2,
            timeout_secs: 120,
        }
    }
}

impl RagConfig {
    /// Load configuration: defaults, then the TOML file named by
    /// `CSV_RAG_CONFIG` (if set), then environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    /// Apply environment overrides using `lookup` for variable access
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(provider) = lookup("CSV_RAG_LLM_PROVIDER") {
            let backend: CompletionBackend = provider.parse()?;
            if backend != self.llm.provider {
                let api_key = self.llm.api_key.take();
                self.llm = match backend {
                    CompletionBackend::Gemini => LlmConfig::default(),
                    CompletionBackend::Ollama => LlmConfig::ollama(),
                };
                self.llm.api_key = api_key;
            }
        }
        if let Some(key) = lookup("GOOGLE_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = lookup("CSV_RAG_LLM_MODEL") {
            self.llm.model = model;
        }
        if let Some(url) = lookup("CSV_RAG_LLM_BASE_URL") {
            self.llm.base_url = url;
        }
        if let Some(path) = lookup("CSV_RAG_DATABASE") {
            self.storage.database_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup("CSV_RAG_UPLOAD_DIR") {
            self.storage.upload_dir = PathBuf::from(dir);
        }
        if let Some(host) = lookup("CSV_RAG_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("CSV_RAG_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| Error::Config(format!("Invalid CSV_RAG_PORT '{}': {}", port, e)))?;
        }
        Ok(())
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.storage.upload_dir.as_os_str().is_empty() {
            return Err(Error::Config("storage.upload_dir must not be empty".to_string()));
        }
        if self.llm.provider == CompletionBackend::Gemini
            && self.llm.api_key.as_deref().map_or(true, str::is_empty)
        {
            return Err(Error::Config(
                "Gemini provider selected but no API key is set (GOOGLE_API_KEY)".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RagConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.upload_dir, PathBuf::from("uploaded"));
        assert_eq!(config.llm.provider, CompletionBackend::Gemini);
        assert_eq!(config.llm.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_partial_toml() {
        let config = RagConfig::from_toml(
            r#"
            [server]
            port = 9000

            [llm]
            provider = "ollama"
            model = "phi3"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.llm.provider, CompletionBackend::Ollama);
        assert_eq!(config.llm.model, "phi3");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = RagConfig::default();
        config
            .apply_env(env(&[
                ("GOOGLE_API_KEY", "secret"),
                ("CSV_RAG_DATABASE", "/tmp/x.db"),
                ("CSV_RAG_PORT", "9100"),
            ]))
            .unwrap();

        assert_eq!(config.llm.api_key.as_deref(), Some("secret"));
        assert_eq!(config.storage.database_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.server.port, 9100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_switching_provider_resets_defaults() {
        let mut config = RagConfig::default();
        config
            .apply_env(env(&[("CSV_RAG_LLM_PROVIDER", "ollama")]))
            .unwrap();

        assert_eq!(config.llm.provider, CompletionBackend::Ollama);
        assert_eq!(config.llm.base_url, "http://localhost:11434");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_port() {
        let mut config = RagConfig::default();
        let err = config.apply_env(env(&[("CSV_RAG_PORT", "http")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_gemini_requires_api_key() {
        let config = RagConfig::default();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
