//! docqa Core Library
//!
//! Grounded question answering over a single ingested document.
//!
//! # Features
//! - Per-page PDF text extraction and overlapping character-window chunking
//! - SQLite vector index with cosine similarity ranking
//! - Batched ingestion through a pluggable [`Embedder`]
//! - Retrieval-augmented answers confined to the retrieved context
//! - OpenAI-compatible and Google Gemini providers

pub mod config;
pub mod db;
pub mod document;
pub mod error;
pub mod index;
pub mod llm;
pub mod qa;

pub use config::{ChunkingConfig, Config, LLMServiceConfig};
pub use db::{
    CollectionInfo, Database, IndexStats, IndexedChunk, RetrievalResult, ScoredChunk, VectorIndex,
};
pub use document::{Document, Page};
pub use error::{DocQaError, Error, Result};
pub use index::{
    ingest_document, ingest_file, split, Chunk, IngestOptions, IngestProgress, IngestStats,
};
pub use llm::{
    providers_from_config, Embedder, GeminiClient, Generator, OpenAIClient, Providers, Vendor,
};
pub use qa::{answer, retrieve, Answer, FailureStage, NO_INFO_ANSWER, PROMPT_TEMPLATE};

/// Default cache directory name
pub const CACHE_DIR_NAME: &str = "docqa";

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "docqa";
