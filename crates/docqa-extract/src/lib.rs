//! Text extraction for DocQA
//!
//! This crate provides the [`TextExtractor`] implementation used on the ingest
//! path: PDF pages, DOCX paragraphs and UTF-8 text are flattened into a single
//! newline-joined string.

mod docx;
mod extractor;
mod pdf;
mod text;

pub use extractor::DocumentExtractor;

// Re-export core types for convenience
pub use docqa_core::{Error, FileType, Result, TextExtractor};
