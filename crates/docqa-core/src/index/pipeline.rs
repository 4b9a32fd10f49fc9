//! Ingestion: document → pages → chunks → embeddings → index, in batches

use super::chunker::{split, CHUNK_OVERLAP_CHARS, CHUNK_SIZE_CHARS};
use crate::config::{ChunkingConfig, DEFAULT_BATCH_SIZE};
use crate::db::VectorIndex;
use crate::document::Document;
use crate::error::{DocQaError, Result};
use crate::llm::Embedder;
use std::path::Path;

/// Chunking and batching policy for one ingestion run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    pub window_size: usize,
    pub overlap: usize,
    pub batch_size: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            window_size: CHUNK_SIZE_CHARS,
            overlap: CHUNK_OVERLAP_CHARS,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl From<&ChunkingConfig> for IngestOptions {
    fn from(config: &ChunkingConfig) -> Self {
        Self {
            window_size: config.window_size,
            overlap: config.overlap,
            batch_size: config.batch_size,
        }
    }
}

/// Ingestion progress, reported after each stored batch
#[derive(Debug, Clone)]
pub struct IngestProgress {
    pub total_chunks: usize,
    pub stored_chunks: usize,
    pub batch: usize,
    pub total_batches: usize,
}

/// Ingestion statistics
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct IngestStats {
    pub pages: usize,
    pub chunks: usize,
    pub batches: usize,
}

/// Progress callback type
pub type ProgressFn = Box<dyn Fn(IngestProgress) + Send + Sync>;

/// Validate, load and ingest the document at `path`.
///
/// Fails with `SourceNotFound` before touching the index when the path is
/// not a readable file.
pub async fn ingest_file(
    path: &Path,
    embedder: &dyn Embedder,
    index: &dyn VectorIndex,
    collection: &str,
    options: IngestOptions,
    progress: Option<ProgressFn>,
) -> Result<IngestStats> {
    let document = Document::load(path)?;
    ingest_document(&document, embedder, index, collection, options, progress).await
}

/// Chunk, embed and upsert an already loaded document.
///
/// Batches are committed as they complete. On the first failure the run
/// stops and the error is returned; batches stored before it stay in the
/// index.
pub async fn ingest_document(
    document: &Document,
    embedder: &dyn Embedder,
    index: &dyn VectorIndex,
    collection: &str,
    options: IngestOptions,
    progress: Option<ProgressFn>,
) -> Result<IngestStats> {
    if options.batch_size == 0 {
        return Err(DocQaError::InvalidInput(
            "batch size must be greater than zero".to_string(),
        ));
    }

    let chunks = split(&document.pages, options.window_size, options.overlap)?;
    let total_chunks = chunks.len();
    let total_batches = total_chunks.div_ceil(options.batch_size);

    tracing::info!(
        "Ingesting {:?}: {} pages, {} chunks in {} batches into '{}'",
        document.source,
        document.pages.len(),
        total_chunks,
        total_batches,
        collection
    );

    let mut stats = IngestStats {
        pages: document.pages.len(),
        ..Default::default()
    };

    for (batch_idx, batch) in chunks.chunks(options.batch_size).enumerate() {
        let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
        let vectors = embedder.embed_batch(&texts).await?;

        if vectors.len() != batch.len() {
            return Err(DocQaError::Embedding(format!(
                "{} returned {} vectors for {} texts",
                embedder.model_name(),
                vectors.len(),
                batch.len()
            )));
        }

        index.upsert(collection, batch, &vectors)?;

        stats.chunks += batch.len();
        stats.batches += 1;
        tracing::debug!(
            "Stored batch {}/{} ({} chunks)",
            batch_idx + 1,
            total_batches,
            batch.len()
        );

        if let Some(ref callback) = progress {
            callback(IngestProgress {
                total_chunks,
                stored_chunks: stats.chunks,
                batch: batch_idx + 1,
                total_batches,
            });
        }
    }

    tracing::info!("Ingested {} chunks into '{}'", stats.chunks, collection);
    Ok(stats)
}
