//! Embedding models for DocQA
//!
//! This crate provides the [`Embedder`] implementations: a Candle BERT
//! sentence embedder for real use and a hashing embedder for offline runs.

mod bert;
mod config;
mod hash;
mod pool;

pub use bert::BertEmbedder;
pub use config::{EmbedderBackend, EmbedderConfig};
pub use hash::HashEmbedder;
pub use pool::masked_mean_l2;

// Re-export core types for convenience
pub use docqa_core::{Embedder, Error, Result};
