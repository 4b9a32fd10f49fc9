//! Grounded question answering over the vector index

mod engine;
mod prompt;

pub use engine::*;
pub use prompt::*;
