//! Ingestion pipeline
//!
//! Page chunking and the batched embed-and-upsert pipeline.

mod chunker;
mod pipeline;

pub use chunker::*;
pub use pipeline::*;
