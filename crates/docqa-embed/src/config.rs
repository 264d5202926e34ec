//! Embedder selection

use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;
use tracing::info;

use docqa_core::{Embedder, Error, Result};

use crate::{BertEmbedder, HashEmbedder};

/// Which embedding implementation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderBackend {
    /// Pretrained sentence-transformer via Candle
    Bert,
    /// Offline token-hashing embedder
    Hash,
}

/// Configuration for the embedding model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedderConfig {
    pub backend: EmbedderBackend,
    pub model_id: String,
    pub dimension: usize,
    pub max_tokens: usize,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            backend: EmbedderBackend::Bert,
            model_id: Self::DEFAULT_MODEL.to_string(),
            dimension: 384,
            max_tokens: 256,
        }
    }
}

impl EmbedderConfig {
    pub const DEFAULT_MODEL: &'static str = "sentence-transformers/all-MiniLM-L6-v2";

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();
        if let Ok(model_id) = env::var("DOCQA_EMBEDDING_MODEL") {
            config.model_id = model_id;
        }
        if let Ok(backend) = env::var("DOCQA_EMBEDDER") {
            config.backend = parse_backend(&backend)?;
        }
        if let Ok(dim) = env::var("DOCQA_EMBEDDING_DIM") {
            config.dimension = dim.trim().parse().map_err(|_| {
                Error::Configuration(format!("DOCQA_EMBEDDING_DIM must be a number, got '{}'", dim))
            })?;
        }
        Ok(config)
    }

    /// Use the offline hashing embedder
    pub fn hashed(mut self) -> Self {
        self.backend = EmbedderBackend::Hash;
        self
    }

    /// Construct the configured embedder. Model weights load lazily on first use.
    pub fn build(&self) -> Result<Arc<dyn Embedder>> {
        info!("Using {:?} embedder ({} dims)", self.backend, self.dimension);
        match self.backend {
            EmbedderBackend::Bert => Ok(Arc::new(BertEmbedder::new(
                self.model_id.clone(),
                self.dimension,
                self.max_tokens,
            ))),
            EmbedderBackend::Hash => Ok(Arc::new(HashEmbedder::new(self.dimension)?)),
        }
    }
}

fn parse_backend(raw: &str) -> Result<EmbedderBackend> {
    match raw.trim().to_lowercase().as_str() {
        "bert" | "candle" => Ok(EmbedderBackend::Bert),
        "hash" | "fake" => Ok(EmbedderBackend::Hash),
        other => Err(Error::Configuration(format!(
            "Unknown embedder '{}', expected 'bert' or 'hash'",
            other
        ))),
    }
}
