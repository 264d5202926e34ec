//! Overlapping text chunker
//!
//! Splits text into windows of at most `chunk_size` chars. Each window ends
//! at the latest natural boundary it contains (paragraph, line, sentence,
//! word), falling back to a hard cut. Consecutive chunks share at most
//! `chunk_overlap` chars, and every chunk is an exact slice of the input so
//! [`stitch`] can rebuild the original text.

use serde::{Deserialize, Serialize};

use docqa_core::{Error, RagConfig, Result, TextChunk};

/// Chunk sizing, in chars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkerConfig {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl ChunkerConfig {
    /// Validate and create a configuration. The overlap must be strictly
    /// smaller than the chunk size so every window makes progress.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::InvalidInput("chunk_size must be greater than 0".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(Error::InvalidInput(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn from_rag_config(config: &RagConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Boundary-aware chunker
#[derive(Debug, Clone, Default)]
pub struct RecursiveChunker {
    config: ChunkerConfig,
}

impl RecursiveChunker {
    pub fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Split `text` into chunks. Empty or whitespace-only input yields none.
    pub fn split(&self, text: &str) -> Vec<TextChunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        let total = chars.len();
        let size = self.config.chunk_size;
        let overlap = self.config.chunk_overlap;

        if total <= size {
            return vec![TextChunk {
                index: 0,
                text: text.to_string(),
                start: 0,
                end: total,
            }];
        }

        let mut chunks = Vec::new();
        let mut start = 0;
        loop {
            if total - start <= size {
                chunks.push(make_chunk(&chars, chunks.len(), start, total));
                break;
            }

            // Ending past start + overlap keeps the next start ahead of this one
            let end = find_break(&chars, start + overlap + 1, start + size);
            chunks.push(make_chunk(&chars, chunks.len(), start, end));
            start = next_start(&chars, end - overlap, end);
        }

        chunks
    }
}

fn make_chunk(chars: &[char], index: usize, start: usize, end: usize) -> TextChunk {
    TextChunk {
        index,
        text: chars[start..end].iter().collect(),
        start,
        end,
    }
}

/// Latest chunk end in `min_end..=max_end`, by boundary priority.
///
/// Requires `max_end < chars.len()`.
fn find_break(chars: &[char], min_end: usize, max_end: usize) -> usize {
    let paragraph = |b: usize| b >= 2 && chars[b - 1] == '\n' && chars[b - 2] == '\n';
    let line = |b: usize| chars[b - 1] == '\n';
    let sentence = |b: usize| matches!(chars[b - 1], '.' | '!' | '?') && chars[b].is_whitespace();
    let word = |b: usize| chars[b - 1].is_whitespace();

    let boundaries: [&dyn Fn(usize) -> bool; 4] = [&paragraph, &line, &sentence, &word];
    boundaries
        .iter()
        .find_map(|is_boundary| (min_end..=max_end).rev().find(|&b| is_boundary(b)))
        .unwrap_or(max_end)
}

/// Start of the next chunk: the first word start inside the overlap region,
/// or the raw overlap position when the region has none.
fn next_start(chars: &[char], from: usize, end: usize) -> usize {
    (from..end)
        .find(|&j| j > 0 && chars[j - 1].is_whitespace() && !chars[j].is_whitespace())
        .unwrap_or(from)
}

/// Concatenate chunks, dropping the prefix each chunk shares with its predecessor.
pub fn stitch(chunks: &[TextChunk]) -> String {
    let mut out = String::new();
    let mut covered: usize = 0;
    for chunk in chunks {
        let skip = covered.saturating_sub(chunk.start);
        out.extend(chunk.text.chars().skip(skip));
        covered = covered.max(chunk.end);
    }
    out
}
