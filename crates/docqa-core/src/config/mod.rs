//! Configuration management
//!
//! A [`Config`] is assembled once at startup from the YAML config file and the
//! process environment, then handed to the pipelines by value or reference.

use crate::error::{DocQaError, Result};
use crate::index::{CHUNK_OVERLAP_CHARS, CHUNK_SIZE_CHARS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default collection name for ingested chunks
pub const DEFAULT_COLLECTION: &str = "document_chunks";

/// Default number of chunks retrieved per question
pub const DEFAULT_TOP_K: usize = 10;

/// Default number of chunks embedded and upserted per batch
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// Default source document when none is configured
pub const DEFAULT_PDF_PATH: &str = "document.pdf";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite index location (defaults to the user cache directory)
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Source document to ingest
    #[serde(default = "default_pdf_path")]
    pub pdf_path: PathBuf,

    /// Collection that partitions the vector index
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Number of chunks retrieved per question
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Chunking and batching policy
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Embedding/chat providers
    #[serde(default)]
    pub llm_service: LLMServiceConfig,
}

/// Chunking policy for ingestion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkingConfig {
    /// Window size in characters
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Characters shared by consecutive chunks of a page
    #[serde(default = "default_overlap")]
    pub overlap: usize,

    /// Chunks embedded and upserted per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            overlap: default_overlap(),
            batch_size: default_batch_size(),
        }
    }
}

/// External inference service configuration.
///
/// OpenAI takes precedence when both API keys are present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMServiceConfig {
    #[serde(default)]
    pub openai: OpenAIConfig,

    #[serde(default)]
    pub google: GoogleConfig,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for LLMServiceConfig {
    fn default() -> Self {
        Self {
            openai: OpenAIConfig::default(),
            google: GoogleConfig::default(),
            timeout_secs: default_timeout(),
        }
    }
}

/// OpenAI (or OpenAI-compatible) endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL without the `/v1` suffix
    #[serde(default = "default_openai_url")]
    pub base_url: String,

    #[serde(default = "default_openai_embedding_model")]
    pub embedding_model: String,

    #[serde(default = "default_openai_llm_model")]
    pub llm_model: String,

    /// Embedding dimensions (defaults to the model's native size)
    #[serde(default)]
    pub embedding_dimensions: Option<usize>,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openai_url(),
            embedding_model: default_openai_embedding_model(),
            llm_model: default_openai_llm_model(),
            embedding_dimensions: None,
        }
    }
}

/// Google Gemini endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_google_url")]
    pub base_url: String,

    #[serde(default = "default_google_embedding_model")]
    pub embedding_model: String,

    #[serde(default = "default_google_llm_model")]
    pub llm_model: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_google_url(),
            embedding_model: default_google_embedding_model(),
            llm_model: default_google_llm_model(),
        }
    }
}

fn default_pdf_path() -> PathBuf {
    PathBuf::from(DEFAULT_PDF_PATH)
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_window_size() -> usize {
    CHUNK_SIZE_CHARS
}

fn default_overlap() -> usize {
    CHUNK_OVERLAP_CHARS
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_timeout() -> u64 {
    60
}

fn default_openai_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_openai_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_openai_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_google_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_google_embedding_model() -> String {
    "models/embedding-001".to_string()
}

fn default_google_llm_model() -> String {
    "gemini-2.0-flash".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: None,
            pdf_path: default_pdf_path(),
            collection: default_collection(),
            top_k: default_top_k(),
            chunking: ChunkingConfig::default(),
            llm_service: LLMServiceConfig::default(),
        }
    }
}

impl Config {
    /// Load config from default path, then apply environment overrides
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        let config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Config::default()
        };
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Load config from an explicit YAML file (no environment overrides)
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    /// Apply overrides from a variable lookup (normally the process environment).
    ///
    /// Unparseable numeric values are ignored with a warning.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(db) = non_empty("DOCQA_DB") {
            self.database_path = Some(PathBuf::from(db));
        }
        if let Some(path) = non_empty("DOCQA_PDF_PATH") {
            self.pdf_path = PathBuf::from(path);
        }
        if let Some(collection) = non_empty("DOCQA_COLLECTION") {
            self.collection = collection;
        }
        if let Some(value) = non_empty("DOCQA_BATCH_SIZE") {
            match value.parse() {
                Ok(n) => self.chunking.batch_size = n,
                Err(_) => tracing::warn!("Ignoring invalid DOCQA_BATCH_SIZE: {}", value),
            }
        }
        if let Some(value) = non_empty("DOCQA_TIMEOUT_SECS") {
            match value.parse() {
                Ok(n) => self.llm_service.timeout_secs = n,
                Err(_) => tracing::warn!("Ignoring invalid DOCQA_TIMEOUT_SECS: {}", value),
            }
        }

        let openai = &mut self.llm_service.openai;
        if let Some(key) = non_empty("OPENAI_API_KEY") {
            openai.api_key = Some(key);
        }
        if let Some(url) = non_empty("OPENAI_BASE_URL") {
            openai.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = non_empty("OPENAI_EMBEDDING_MODEL") {
            openai.embedding_model = model;
        }
        if let Some(model) = non_empty("OPENAI_LLM_MODEL") {
            openai.llm_model = model;
        }

        let google = &mut self.llm_service.google;
        if let Some(key) = non_empty("GOOGLE_API_KEY") {
            google.api_key = Some(key);
        }
        if let Some(model) = non_empty("GOOGLE_EMBEDDING_MODEL") {
            google.embedding_model = model;
        }
        if let Some(model) = non_empty("GOOGLE_LLM_MODEL") {
            google.llm_model = model;
        }

        self
    }

    /// Resolved database path
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(crate::db::Database::default_path)
    }

    /// Check that the numeric policy is usable
    pub fn validate(&self) -> Result<()> {
        let chunking = &self.chunking;
        if chunking.window_size == 0 || chunking.overlap == 0 {
            return Err(DocQaError::Config(
                "window_size and overlap must be greater than zero".to_string(),
            ));
        }
        if chunking.overlap >= chunking.window_size {
            return Err(DocQaError::Config(format!(
                "overlap ({}) must be less than window_size ({})",
                chunking.overlap, chunking.window_size
            )));
        }
        if chunking.batch_size == 0 {
            return Err(DocQaError::Config(
                "batch_size must be greater than zero".to_string(),
            ));
        }
        if self.top_k == 0 {
            return Err(DocQaError::Config(
                "top_k must be greater than zero".to_string(),
            ));
        }
        if self.collection.trim().is_empty() {
            return Err(DocQaError::Config(
                "collection name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
