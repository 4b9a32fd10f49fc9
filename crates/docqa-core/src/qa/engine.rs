//! Retrieval-augmented answering
//!
//! A question is embedded, matched against the index, and answered by the
//! generator from the retrieved context only. Collaborator failures are
//! reported through [`Answer::Failed`] instead of an error.

use super::prompt::{build_context, build_prompt, NO_INFO_ANSWER};
use crate::db::{RetrievalResult, VectorIndex};
use crate::error::{DocQaError, Result};
use crate::llm::{Embedder, Generator};
use serde::Serialize;
use std::fmt;

/// Pipeline stage an answer failed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStage {
    Embedding,
    Retrieval,
    Generation,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Embedding => write!(f, "embedding"),
            FailureStage::Retrieval => write!(f, "retrieval"),
            FailureStage::Generation => write!(f, "generation"),
        }
    }
}

/// Outcome of answering one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Answer {
    Answered { text: String },
    Failed { stage: FailureStage, message: String },
}

impl Answer {
    pub fn is_answered(&self) -> bool {
        matches!(self, Answer::Answered { .. })
    }

    /// Text for display: the answer itself, or a description of the failure
    pub fn into_text(self) -> String {
        match self {
            Answer::Answered { text } => text,
            failed => failed.to_string(),
        }
    }

    fn failed(stage: FailureStage, err: DocQaError) -> Self {
        tracing::warn!("Answer failed during {}: {}", stage, err);
        Answer::Failed {
            stage,
            message: err.to_string(),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Answered { text } => write!(f, "{}", text),
            Answer::Failed { stage, message } => {
                write!(f, "Could not answer ({} failed): {}", stage, message)
            }
        }
    }
}

/// Embed `question` and return the `k` best matching chunks.
///
/// An unknown collection yields no chunks; every other index error, including
/// a dimension mismatch, is returned.
pub async fn retrieve(
    question: &str,
    embedder: &dyn Embedder,
    index: &dyn VectorIndex,
    collection: &str,
    k: usize,
) -> Result<RetrievalResult> {
    let vector = embedder.embed(question.trim()).await?;
    query_index(index, collection, &vector, k)
}

fn query_index(
    index: &dyn VectorIndex,
    collection: &str,
    vector: &[f32],
    k: usize,
) -> Result<RetrievalResult> {
    match index.query(collection, vector, k) {
        Err(DocQaError::CollectionNotFound(name)) => {
            tracing::info!("Collection '{}' is empty; answering without context", name);
            Ok(Vec::new())
        }
        other => other,
    }
}

/// Answer `question` from the indexed document.
///
/// A blank question gets [`NO_INFO_ANSWER`] without calling any collaborator.
/// The generator's reply is returned unmodified.
pub async fn answer(
    question: &str,
    embedder: &dyn Embedder,
    generator: &dyn Generator,
    index: &dyn VectorIndex,
    collection: &str,
    k: usize,
) -> Answer {
    let question = question.trim();
    if question.is_empty() {
        return Answer::Answered {
            text: NO_INFO_ANSWER.to_string(),
        };
    }

    let vector = match embedder.embed(question).await {
        Ok(v) => v,
        Err(e) => return Answer::failed(FailureStage::Embedding, e),
    };

    let results = match query_index(index, collection, &vector, k) {
        Ok(r) => r,
        Err(e) => return Answer::failed(FailureStage::Retrieval, e),
    };
    tracing::debug!("Retrieved {} chunks for question", results.len());

    let prompt = build_prompt(&build_context(&results), question);

    match generator.generate(&prompt).await {
        Ok(text) => Answer::Answered { text },
        Err(e) => Answer::failed(FailureStage::Generation, e),
    }
}
