//! Pipeline configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use crate::{Error, Result};

/// Tunables for chunking, indexing and retrieval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
    pub embed_batch_size: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 4,
            embed_batch_size: 32,
        }
    }
}

impl RagConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            chunk_size: parse_var(&lookup, "DOCQA_CHUNK_SIZE", defaults.chunk_size)?,
            chunk_overlap: parse_var(&lookup, "DOCQA_CHUNK_OVERLAP", defaults.chunk_overlap)?,
            top_k: parse_var(&lookup, "DOCQA_TOP_K", defaults.top_k)?,
            embed_batch_size: parse_var(
                &lookup,
                "DOCQA_EMBED_BATCH_SIZE",
                defaults.embed_batch_size,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would stall chunking or retrieval
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::Configuration("chunk_size must be greater than 0".to_string()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::Configuration(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.top_k == 0 {
            return Err(Error::Configuration("top_k must be greater than 0".to_string()));
        }
        if self.embed_batch_size == 0 {
            return Err(Error::Configuration(
                "embed_batch_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Configuration(format!("{} must be a number, got '{}'", key, raw))),
        None => Ok(default),
    }
}
