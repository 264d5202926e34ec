//! Vector store trait and types

use serde::{Deserialize, Serialize};

use crate::{Result, TextChunk};

/// A chunk returned from a similarity search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: TextChunk,
    pub score: f32,
}

/// Trait for in-memory nearest-neighbour structures
///
/// `search` returns at most `k` hits ordered by descending similarity.
pub trait VectorStore: Send + Sync {
    /// Add a vector with its chunk payload
    fn add(&mut self, vector: Vec<f32>, chunk: TextChunk) -> Result<()>;

    /// Find the `k` stored chunks most similar to `query`
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>>;

    /// Number of stored vectors
    fn len(&self) -> usize;

    /// True when nothing has been added
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vector dimension accepted by this store
    fn dimension(&self) -> usize;
}
