//! Sentence-transformer embedder using Candle.
//!
//! Defaults to sentence-transformers/all-MiniLM-L6-v2:
//! - 384 dimensions
//! - BERT architecture, mean pooling, L2 normalisation

use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use hf_hub::{Repo, RepoType, api::tokio::Api};
use std::sync::Arc;
use tokenizers::Tokenizer;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use docqa_core::{Embedder, Error, Result};

use crate::pool::masked_mean_l2;

struct LoadedModel {
    model: BertModel,
    tokenizer: Tokenizer,
}

/// BERT sentence embedder. Weights are downloaded from the HuggingFace Hub
/// and loaded on first use.
pub struct BertEmbedder {
    model_id: String,
    dimension: usize,
    max_tokens: usize,
    device: Device,
    loaded: OnceCell<Arc<LoadedModel>>,
}

fn load_err(context: &str, e: impl std::fmt::Display) -> Error {
    Error::Embedding(format!("{context}: {e}"))
}

impl BertEmbedder {
    pub fn new(model_id: impl Into<String>, dimension: usize, max_tokens: usize) -> Self {
        let device = select_device();
        info!("BertEmbedder using device: {:?}", device);
        Self {
            model_id: model_id.into(),
            dimension,
            max_tokens,
            device,
            loaded: OnceCell::new(),
        }
    }

    /// Download (if needed) and load the model. Safe to call repeatedly.
    pub async fn init(&self) -> Result<()> {
        self.model().await.map(|_| ())
    }

    async fn model(&self) -> Result<Arc<LoadedModel>> {
        self.loaded
            .get_or_try_init(|| self.load())
            .await
            .map(Arc::clone)
    }

    async fn load(&self) -> Result<Arc<LoadedModel>> {
        info!("Loading embedding model: {}", self.model_id);

        let api = Api::new().map_err(|e| load_err("Failed to create HF API", e))?;
        let repo = api.repo(Repo::new(self.model_id.clone(), RepoType::Model));

        debug!("Fetching tokenizer, config and weights...");
        let tokenizer_path = repo
            .get("tokenizer.json")
            .await
            .map_err(|e| load_err("Failed to download tokenizer", e))?;
        let config_path = repo
            .get("config.json")
            .await
            .map_err(|e| load_err("Failed to download config", e))?;
        let weights_path = repo
            .get("model.safetensors")
            .await
            .map_err(|e| load_err("Failed to download weights", e))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| load_err("Failed to load tokenizer", e))?;
        let config_str = tokio::fs::read_to_string(&config_path).await?;
        let config: Config = serde_json::from_str(&config_str)
            .map_err(|e| load_err("Failed to parse config", e))?;

        let device = self.device.clone();
        let model = tokio::task::spawn_blocking(move || {
            // SAFETY: the safetensors file comes from the HF cache and is only read.
            let vb = unsafe {
                VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                    .map_err(|e| load_err("Failed to load weights", e))?
            };
            BertModel::load(vb, &config).map_err(|e| load_err("Failed to create BERT model", e))
        })
        .await
        .map_err(|e| load_err("Model load task failed", e))??;

        info!("Embedding model {} loaded", self.model_id);
        Ok(Arc::new(LoadedModel { model, tokenizer }))
    }
}

impl LoadedModel {
    fn encode(&self, texts: &[String], max_tokens: usize, device: &Device) -> Result<Vec<Vec<f32>>> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| load_err("Tokenization failed", e))?;

        let max_len = encodings
            .iter()
            .map(|e| e.len())
            .max()
            .unwrap_or(0)
            .min(max_tokens)
            .max(1);
        let batch_size = texts.len();

        let mut input_ids = Vec::with_capacity(batch_size * max_len);
        let mut attention_mask = Vec::with_capacity(batch_size * max_len);
        for encoding in &encodings {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();
            let len = ids.len().min(max_len);
            for i in 0..max_len {
                if i < len {
                    input_ids.push(ids[i]);
                    attention_mask.push(mask[i]);
                } else {
                    input_ids.push(0);
                    attention_mask.push(0);
                }
            }
        }

        let input_ids = Tensor::from_vec(input_ids, (batch_size, max_len), device)
            .map_err(|e| load_err("Failed to create input_ids tensor", e))?;
        let attention_mask = Tensor::from_vec(attention_mask, (batch_size, max_len), device)
            .map_err(|e| load_err("Failed to create attention_mask tensor", e))?;
        let token_type_ids = input_ids
            .zeros_like()
            .map_err(|e| load_err("Failed to create token_type_ids tensor", e))?;

        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))
            .map_err(|e| load_err("Model forward failed", e))?;

        masked_mean_l2(&hidden, &attention_mask)
            .and_then(|t| t.to_vec2::<f32>())
            .map_err(|e| load_err("Pooling failed", e))
    }
}

#[async_trait]
impl Embedder for BertEmbedder {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = self.model().await?;
        let texts = texts.to_vec();
        let max_tokens = self.max_tokens;
        let device = self.device.clone();

        debug!("Embedding {} texts", texts.len());
        let vectors = tokio::task::spawn_blocking(move || model.encode(&texts, max_tokens, &device))
            .await
            .map_err(|e| load_err("Embedding task failed", e))??;

        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dimension) {
            return Err(Error::Embedding(format!(
                "Model {} produced {}-dimensional vectors, expected {}",
                self.model_id,
                bad.len(),
                self.dimension
            )));
        }
        Ok(vectors)
    }
}

fn select_device() -> Device {
    #[cfg(feature = "cuda")]
    {
        if let Ok(dev) = Device::new_cuda(0) {
            return dev;
        }
    }
    #[cfg(feature = "metal")]
    {
        if let Ok(dev) = Device::new_metal(0) {
            return dev;
        }
    }
    Device::Cpu
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires model download
    async fn test_minilm_embeddings() {
        let embedder = BertEmbedder::new("sentence-transformers/all-MiniLM-L6-v2", 384, 256);
        embedder.init().await.unwrap();

        let texts = vec!["Patient has mild fever.".to_string(), "Invoice overdue".to_string()];
        let embs = embedder.embed_batch(&texts).await.unwrap();
        assert_eq!(embs.len(), 2);
        assert_eq!(embs[0].len(), 384);

        let norm: f32 = embs[0].iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.01);

        let again = embedder.embed_query("Patient has mild fever.").await.unwrap();
        for (a, b) in again.iter().zip(&embs[0]) {
            assert!((a - b).abs() < 1e-4);
        }
    }

    #[tokio::test]
    async fn test_empty_batch_does_not_load_model() {
        let embedder = BertEmbedder::new("sentence-transformers/all-MiniLM-L6-v2", 384, 256);
        assert!(embedder.embed_batch(&[]).await.unwrap().is_empty());
        assert!(embedder.loaded.get().is_none());
    }
}
