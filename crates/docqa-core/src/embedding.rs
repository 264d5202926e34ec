//! Embedding model trait

use async_trait::async_trait;

use crate::{Error, Result};

/// Trait for text embedding models
///
/// Implementations must be deterministic: the same text always yields the
/// same vector, and every vector has length [`Embedder::dimension`].
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Identifier of the underlying model
    fn model_id(&self) -> &str;

    /// Length of every vector this embedder produces
    fn dimension(&self) -> usize;

    /// Embed a batch of texts, one vector per input in the same order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single query string
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("Empty embedding result".to_string()))
    }
}
