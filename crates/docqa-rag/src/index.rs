//! Embedding index for the active document
//!
//! A new index is built off to the side and only published once every chunk
//! has been embedded, so a failed ingest leaves the previous document
//! answerable and readers never observe a half-built index.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use docqa_core::{Embedder, Error, Result, ScoredChunk, TextChunk, VectorStore};

use crate::vector_store::FlatVectorStore;

/// Searchable index over one document's chunks
#[derive(Debug)]
pub struct DocumentIndex {
    doc_id: String,
    model_id: String,
    store: FlatVectorStore,
    created_at: DateTime<Utc>,
}

impl DocumentIndex {
    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub fn summary(&self) -> IndexSummary {
        IndexSummary {
            doc_id: self.doc_id.clone(),
            chunk_count: self.store.len(),
            dimension: self.store.dimension(),
            model_id: self.model_id.clone(),
            created_at: self.created_at,
        }
    }
}

/// Description of a built index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexSummary {
    pub doc_id: String,
    pub chunk_count: usize,
    pub dimension: usize,
    pub model_id: String,
    pub created_at: DateTime<Utc>,
}

/// Holds the active document index and the embedder used to build and query it
pub struct EmbeddingIndex {
    embedder: Arc<dyn Embedder>,
    batch_size: usize,
    active: RwLock<Option<Arc<DocumentIndex>>>,
}

impl EmbeddingIndex {
    pub fn new(embedder: Arc<dyn Embedder>, batch_size: usize) -> Self {
        Self {
            embedder,
            batch_size: batch_size.max(1),
            active: RwLock::new(None),
        }
    }

    /// Embed `chunks` and replace the active index with them.
    ///
    /// On any error the previously active index stays in place.
    pub async fn embed_and_index(&self, chunks: Vec<TextChunk>, doc_id: &str) -> Result<IndexSummary> {
        if chunks.is_empty() {
            return Err(Error::EmptyContent);
        }

        let dimension = self.embedder.dimension();
        let mut store = FlatVectorStore::with_capacity(dimension, chunks.len());

        for batch in chunks.chunks(self.batch_size) {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let vectors = self
                .embedder
                .embed_batch(&texts)
                .await
                .map_err(|e| Error::IndexBuild(format!("Embedding failed: {}", e)))?;

            if vectors.len() != batch.len() {
                return Err(Error::IndexBuild(format!(
                    "Embedder returned {} vectors for {} chunks",
                    vectors.len(),
                    batch.len()
                )));
            }

            for (vector, chunk) in vectors.into_iter().zip(batch.iter().cloned()) {
                store
                    .add(vector, chunk)
                    .map_err(|e| Error::IndexBuild(e.to_string()))?;
            }
            debug!("Embedded {}/{} chunks", store.len(), chunks.len());
        }

        let index = Arc::new(DocumentIndex {
            doc_id: doc_id.to_string(),
            model_id: self.embedder.model_id().to_string(),
            store,
            created_at: Utc::now(),
        });
        let summary = index.summary();

        *self.active.write().unwrap_or_else(PoisonError::into_inner) = Some(index);
        info!(
            "Indexed document {} ({} chunks, {} dims)",
            summary.doc_id, summary.chunk_count, summary.dimension
        );

        Ok(summary)
    }

    /// Return up to `k` chunks of the active document most similar to `query`.
    ///
    /// With no active index this is empty and the embedder is not called.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        let Some(index) = self.current() else {
            debug!("Search with no active index");
            return Ok(Vec::new());
        };
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self.embedder.embed_query(query).await?;
        index.store.search(&query_vector, k)
    }

    /// Drop the active index, returning the id of the document it held
    pub fn clear(&self) -> Option<String> {
        let previous = self
            .active
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        previous.map(|index| index.doc_id.clone())
    }

    pub fn active_doc_id(&self) -> Option<String> {
        self.current().map(|index| index.doc_id.clone())
    }

    pub fn summary(&self) -> Option<IndexSummary> {
        self.current().map(|index| index.summary())
    }

    /// Snapshot of the active index; searches keep using it even if it is replaced
    pub fn current(&self) -> Option<Arc<DocumentIndex>> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
