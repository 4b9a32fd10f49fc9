//! Chunk storage and similarity query

use super::vectors::{bytes_to_embedding, cosine_similarity, embedding_to_bytes, top_k_by_score};
use super::{Database, VectorIndex};
use crate::error::{DocQaError, Result};
use crate::index::Chunk;
use chrono::Utc;
use rusqlite::params;
use serde::Serialize;
use uuid::Uuid;

/// A chunk as persisted in the index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexedChunk {
    pub id: String,
    #[serde(flatten)]
    pub chunk: Chunk,
    #[serde(skip)]
    pub embedding: Vec<f32>,
}

/// A retrieved chunk with its cosine similarity to the query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredChunk {
    #[serde(flatten)]
    pub indexed: IndexedChunk,
    pub score: f32,
}

impl ScoredChunk {
    pub fn text(&self) -> &str {
        &self.indexed.chunk.text
    }
}

/// Retrieved chunks, best first
pub type RetrievalResult = Vec<ScoredChunk>;

impl VectorIndex for Database {
    fn upsert(
        &self,
        collection: &str,
        chunks: &[Chunk],
        vectors: &[Vec<f32>],
    ) -> Result<Vec<String>> {
        if chunks.len() != vectors.len() {
            return Err(DocQaError::InvalidInput(format!(
                "got {} chunks but {} vectors",
                chunks.len(),
                vectors.len()
            )));
        }
        let Some(first) = vectors.first() else {
            return Ok(Vec::new());
        };

        let dimensions = first.len();
        if dimensions == 0 {
            return Err(DocQaError::InvalidInput(
                "embedding vectors must not be empty".to_string(),
            ));
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimensions) {
            return Err(DocQaError::DimensionMismatch {
                expected: dimensions,
                actual: bad.len(),
            });
        }

        let now = Utc::now().to_rfc3339();

        self.conn.execute("BEGIN IMMEDIATE", [])?;
        let result = (|| -> Result<Vec<String>> {
            self.register_collection(collection, dimensions, &now)?;

            let mut stmt = self.conn.prepare_cached(
                "INSERT INTO chunks (id, collection, page, char_offset, text, embedding, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;

            let mut ids = Vec::with_capacity(chunks.len());
            for (chunk, vector) in chunks.iter().zip(vectors) {
                let id = Uuid::new_v4().to_string();
                stmt.execute(params![
                    id,
                    collection,
                    chunk.source_page,
                    chunk.offset as i64,
                    chunk.text,
                    embedding_to_bytes(vector),
                    now,
                ])?;
                ids.push(id);
            }
            Ok(ids)
        })();

        if result.is_ok() {
            self.conn.execute("COMMIT", [])?;
        } else {
            let _ = self.conn.execute("ROLLBACK", []);
        }

        if let Ok(ids) = &result {
            tracing::debug!("Upserted {} chunks into '{}'", ids.len(), collection);
        }
        result
    }

    fn query(&self, collection: &str, vector: &[f32], k: usize) -> Result<RetrievalResult> {
        let dimensions = self
            .collection_dimensions(collection)?
            .ok_or_else(|| DocQaError::CollectionNotFound(collection.to_string()))?;

        if vector.len() != dimensions {
            return Err(DocQaError::DimensionMismatch {
                expected: dimensions,
                actual: vector.len(),
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare_cached(
            "SELECT id, page, char_offset, text, embedding
             FROM chunks
             WHERE collection = ?1
             ORDER BY seq",
        )?;

        let stored = stmt
            .query_map(params![collection], |row| {
                let offset: i64 = row.get(2)?;
                let embedding_bytes: Vec<u8> = row.get(4)?;
                Ok(IndexedChunk {
                    id: row.get(0)?,
                    chunk: Chunk {
                        source_page: row.get(1)?,
                        offset: offset as usize,
                        text: row.get(3)?,
                    },
                    embedding: bytes_to_embedding(&embedding_bytes),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let scored: Vec<(IndexedChunk, f32)> = stored
            .into_iter()
            .map(|indexed| {
                let score = cosine_similarity(vector, &indexed.embedding);
                (indexed, score)
            })
            .collect();

        let results: RetrievalResult = top_k_by_score(scored, k)
            .into_iter()
            .map(|(indexed, score)| ScoredChunk { indexed, score })
            .collect();

        tracing::debug!(
            "Query on '{}' returned {} chunks (k={})",
            collection,
            results.len(),
            k
        );
        Ok(results)
    }
}

impl Database {
    /// Record a collection on first use, or check its dimension on later use
    fn register_collection(&self, collection: &str, dimensions: usize, now: &str) -> Result<()> {
        match self.collection_dimensions(collection)? {
            Some(stored) if stored != dimensions => Err(DocQaError::DimensionMismatch {
                expected: stored,
                actual: dimensions,
            }),
            Some(_) => {
                self.conn.execute(
                    "UPDATE collections SET updated_at = ?2 WHERE name = ?1",
                    params![collection, now],
                )?;
                Ok(())
            }
            None => {
                self.conn.execute(
                    "INSERT INTO collections (name, dimensions, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?3)",
                    params![collection, dimensions as i64, now],
                )?;
                Ok(())
            }
        }
    }

    /// Embedding dimension of a collection, if it exists
    pub fn collection_dimensions(&self, collection: &str) -> Result<Option<usize>> {
        let result = self.conn.query_row(
            "SELECT dimensions FROM collections WHERE name = ?1",
            params![collection],
            |row| row.get::<_, i64>(0),
        );

        match result {
            Ok(dims) => Ok(Some(dims as usize)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Count chunks stored in a collection
    pub fn count_chunks(&self, collection: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM chunks WHERE collection = ?1",
            params![collection],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
