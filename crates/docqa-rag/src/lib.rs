//! RAG (Retrieval-Augmented Generation) engine for DocQA
//!
//! This crate chunks extracted document text, indexes it with an embedding
//! model, retrieves the passages closest to a question and asks an LLM to
//! answer from them. [`RagPipeline`] ties the stages together for one
//! session and [`SessionRegistry`] keeps sessions apart.

mod chunker;
mod generator;
mod index;
mod pipeline;
mod registry;
mod retriever;
mod vector_store;

#[cfg(test)]
mod tests;

pub use chunker::{ChunkerConfig, RecursiveChunker, stitch};
pub use generator::{AnswerGenerator, build_context, render_prompt};
pub use index::{DocumentIndex, EmbeddingIndex, IndexSummary};
pub use pipeline::RagPipeline;
pub use registry::SessionRegistry;
pub use retriever::Retriever;
pub use vector_store::FlatVectorStore;

// Re-export core types for convenience
pub use docqa_core::{
    Answer, Embedder, Error, FileType, IngestReport, LLMProvider, PipelineState, RagConfig, Result,
    ScoredChunk, TextChunk, TextExtractor, VectorStore,
};
