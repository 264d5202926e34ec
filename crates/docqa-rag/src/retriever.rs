//! Top-k context retrieval

use tracing::debug;

use docqa_core::{Result, ScoredChunk};

use crate::index::EmbeddingIndex;

/// Fetches the chunks most relevant to a question from an [`EmbeddingIndex`]
pub struct Retriever<'a> {
    index: &'a EmbeddingIndex,
    top_k: usize,
}

impl<'a> Retriever<'a> {
    pub fn new(index: &'a EmbeddingIndex, top_k: usize) -> Self {
        Self { index, top_k }
    }

    /// Up to `top_k` chunks, most similar first. Empty when no document is indexed.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<ScoredChunk>> {
        let hits = self.index.search(query, self.top_k).await?;
        debug!("Retrieved {} chunks (top_k={})", hits.len(), self.top_k);
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docqa_core::TextChunk;
    use docqa_embed::HashEmbedder;
    use std::sync::Arc;

    fn chunk(index: usize, text: &str) -> TextChunk {
        TextChunk {
            index,
            text: text.to_string(),
            start: 0,
            end: text.chars().count(),
        }
    }

    #[tokio::test]
    async fn test_retrieve_respects_top_k() {
        let index = EmbeddingIndex::new(Arc::new(HashEmbedder::new(128).unwrap()), 16);
        let chunks = (0..6)
            .map(|i| chunk(i, &format!("note {} about dosage", i)))
            .collect();
        index.embed_and_index(chunks, "doc").await.unwrap();

        assert_eq!(Retriever::new(&index, 4).retrieve("dosage").await.unwrap().len(), 4);
        assert_eq!(Retriever::new(&index, 10).retrieve("dosage").await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_retrieve_without_document() {
        let index = EmbeddingIndex::new(Arc::new(HashEmbedder::new(128).unwrap()), 16);
        assert!(Retriever::new(&index, 4).retrieve("anything").await.unwrap().is_empty());
    }
}
