//! Ingest and question-answering pipeline for one user session

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use docqa_core::{
    Answer, Embedder, FileType, IngestReport, LLMProvider, PipelineState, RagConfig, Result,
    TextExtractor,
};
use docqa_extract::DocumentExtractor;

use crate::chunker::{ChunkerConfig, RecursiveChunker};
use crate::generator::AnswerGenerator;
use crate::index::{EmbeddingIndex, IndexSummary};
use crate::retriever::Retriever;

/// Owns one session's document index and runs ingest and ask over it
pub struct RagPipeline {
    extractor: Arc<dyn TextExtractor>,
    chunker: RecursiveChunker,
    index: EmbeddingIndex,
    generator: AnswerGenerator,
    top_k: usize,
}

impl RagPipeline {
    pub fn new(
        config: &RagConfig,
        extractor: Arc<dyn TextExtractor>,
        embedder: Arc<dyn Embedder>,
        llm: Arc<dyn LLMProvider>,
    ) -> Result<Self> {
        config.validate()?;
        let chunker = RecursiveChunker::new(ChunkerConfig::from_rag_config(config)?);

        Ok(Self {
            extractor,
            chunker,
            index: EmbeddingIndex::new(embedder, config.embed_batch_size),
            generator: AnswerGenerator::new(llm),
            top_k: config.top_k,
        })
    }

    /// Pipeline using the built-in PDF, DOCX and text extractor
    pub fn with_document_extractor(
        config: &RagConfig,
        embedder: Arc<dyn Embedder>,
        llm: Arc<dyn LLMProvider>,
    ) -> Result<Self> {
        Self::new(config, Arc::new(DocumentExtractor::new()), embedder, llm)
    }

    /// Extract, chunk and index a document, replacing the active one.
    ///
    /// Any failure leaves the previously indexed document in place. A document
    /// without text reports zero chunks and is not indexed.
    pub async fn ingest(&self, bytes: &[u8], file_type: FileType) -> Result<IngestReport> {
        let text = self.extractor.extract(bytes, file_type).await?;
        let chunks = self.chunker.split(&text);
        let doc_id = new_doc_id();

        if chunks.is_empty() {
            warn!("Extracted no text from {} document {}, index unchanged", file_type, doc_id);
            return Ok(IngestReport {
                doc_id,
                chunk_count: 0,
            });
        }

        let summary = self.index.embed_and_index(chunks, &doc_id).await?;

        info!(
            "Ingested {} document {} ({} chars, {} chunks)",
            file_type,
            doc_id,
            text.chars().count(),
            summary.chunk_count
        );
        Ok(IngestReport {
            doc_id,
            chunk_count: summary.chunk_count,
        })
    }

    /// Read a file from disk and ingest it, typed by its extension
    pub async fn ingest_file(&self, path: &Path) -> Result<IngestReport> {
        let file_type = FileType::from_path(path)?;
        let bytes = tokio::fs::read(path).await?;
        self.ingest(&bytes, file_type).await
    }

    /// Answer a question from the active document
    pub async fn ask(&self, query: &str) -> Answer {
        let chunks = match Retriever::new(&self.index, self.top_k).retrieve(query).await {
            Ok(chunks) => chunks,
            Err(e) => {
                warn!("Retrieval failed: {}", e);
                return Answer::Failed {
                    message: format!("Error retrieving context: {}", e),
                };
            }
        };

        self.generator.generate(query, &chunks).await
    }

    /// Forget the active document
    pub fn reset(&self) {
        if let Some(doc_id) = self.index.clear() {
            info!("Cleared document {}", doc_id);
        }
    }

    pub fn state(&self) -> PipelineState {
        match self.index.active_doc_id() {
            Some(doc_id) => PipelineState::Ready { doc_id },
            None => PipelineState::Empty,
        }
    }

    pub fn index_summary(&self) -> Option<IndexSummary> {
        self.index.summary()
    }
}

/// Short document id: the first 8 hex chars of a random UUID
fn new_doc_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_id_shape() {
        let id = new_doc_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(new_doc_id(), new_doc_id());
    }
}
