//! Groq integration for DocQA
//!
//! This crate provides the Groq implementation of the LLMProvider trait.

mod client;
mod config;


pub use client::GroqClient;
pub use config::GroqConfig;

// Re-export core types for convenience
pub use docqa_core::{Error, GenerationConfig, GenerationResult, LLMProvider, Result};
