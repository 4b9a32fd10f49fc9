//! Page chunking for embedding

use crate::document::Page;
use crate::error::{DocQaError, Result};
use serde::Serialize;

/// Chunking configuration
pub const CHUNK_SIZE_CHARS: usize = 1000;
pub const CHUNK_OVERLAP_CHARS: usize = 150;

/// Document chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    pub text: String,
    /// Page number the chunk was cut from
    pub source_page: u32,
    /// Start position within the page, in characters
    pub offset: usize,
}

impl Chunk {
    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Split pages into overlapping fixed-size character windows.
///
/// Each page is chunked on its own: a window of `window_size` characters
/// advances by `window_size - overlap` until the page is exhausted, so no
/// chunk spans two pages. Pages that are empty or whitespace-only produce
/// nothing.
pub fn split(pages: &[Page], window_size: usize, overlap: usize) -> Result<Vec<Chunk>> {
    if window_size == 0 || overlap == 0 {
        return Err(DocQaError::InvalidInput(
            "window size and overlap must be greater than zero".to_string(),
        ));
    }
    if overlap >= window_size {
        return Err(DocQaError::InvalidInput(format!(
            "overlap ({}) must be less than window size ({})",
            overlap, window_size
        )));
    }

    let mut chunks = Vec::new();
    for page in pages {
        chunk_page(page, window_size, overlap, &mut chunks);
    }
    Ok(chunks)
}

fn chunk_page(page: &Page, window_size: usize, overlap: usize, out: &mut Vec<Chunk>) {
    let text = page.text.as_str();
    if text.trim().is_empty() {
        return;
    }

    // Byte offset of every char, plus the end of the string
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_len = boundaries.len() - 1;
    let step = window_size - overlap;

    let mut start = 0;
    loop {
        let end = (start + window_size).min(char_len);
        out.push(Chunk {
            text: text[boundaries[start]..boundaries[end]].to_string(),
            source_page: page.number,
            offset: start,
        });

        if end == char_len {
            break;
        }
        start += step;
    }
}
