//! Database layer for docqa
//!
//! SQLite-backed vector index: chunks and their embeddings are persisted per
//! collection, and similarity is computed in Rust at query time.

mod chunks;
mod collections;
mod schema;
mod stats;
pub mod vectors;

pub use chunks::{IndexedChunk, RetrievalResult, ScoredChunk};
pub use collections::CollectionInfo;
pub use schema::Database;
pub use stats::IndexStats;

use crate::error::Result;
use crate::index::Chunk;
use std::path::PathBuf;

/// Persistent k-nearest-neighbour index over chunk embeddings.
///
/// Every call is its own unit of work: an upsert is committed before it
/// returns, and nothing spans two calls.
pub trait VectorIndex {
    /// Store chunks with their vectors, returning the generated identifiers.
    ///
    /// Never deduplicates; upserting the same chunk twice stores it twice.
    fn upsert(
        &self,
        collection: &str,
        chunks: &[Chunk],
        vectors: &[Vec<f32>],
    ) -> Result<Vec<String>>;

    /// Return up to `k` chunks ranked by similarity, best first.
    ///
    /// Fails with `CollectionNotFound` for an unknown collection and with
    /// `DimensionMismatch` when `vector` has the wrong length.
    fn query(&self, collection: &str, vector: &[f32], k: usize) -> Result<RetrievalResult>;
}

impl Database {
    /// Get the default database path
    pub fn default_path() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CACHE_DIR_NAME)
            .join("index.sqlite")
    }
}
