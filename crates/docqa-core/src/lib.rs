//! Core traits and types for DocQA
//!
//! This crate defines the fundamental traits and types used across the DocQA system.
//! It provides capability-facing interfaces for text extractors, embedding models,
//! vector stores and LLM providers, so every pipeline stage can be swapped in tests.

pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod rag;
pub mod vector_store;

#[cfg(test)]
mod tests;

pub use config::RagConfig;
pub use document::{FileType, TextChunk, TextExtractor};
pub use embedding::Embedder;
pub use error::{Error, Result};
pub use llm::{GenerationConfig, GenerationResult, LLMProvider};
pub use rag::{Answer, INSUFFICIENT_INFORMATION, IngestReport, NO_CONTEXT_ANSWER, PipelineState};
pub use vector_store::{ScoredChunk, VectorStore};
