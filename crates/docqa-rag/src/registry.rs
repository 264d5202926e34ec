//! Per-session pipelines
//!
//! Each session key maps to its own [`RagPipeline`], so documents ingested in
//! one session are never visible from another.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use docqa_core::Result;

use crate::pipeline::RagPipeline;

type PipelineFactory = dyn Fn() -> Result<RagPipeline> + Send + Sync;

/// Lazily creates and keeps one pipeline per session key
pub struct SessionRegistry {
    factory: Box<PipelineFactory>,
    sessions: RwLock<HashMap<String, Arc<RagPipeline>>>,
}

impl SessionRegistry {
    /// `factory` builds the pipeline for each new session. Heavy shared parts
    /// such as the embedder belong in `Arc`s captured by the closure.
    pub fn new(factory: impl Fn() -> Result<RagPipeline> + Send + Sync + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Pipeline for `key`, created on first use
    pub async fn session(&self, key: &str) -> Result<Arc<RagPipeline>> {
        if let Some(pipeline) = self.sessions.read().await.get(key) {
            return Ok(pipeline.clone());
        }

        let mut sessions = self.sessions.write().await;
        if let Some(pipeline) = sessions.get(key) {
            return Ok(pipeline.clone());
        }

        let pipeline = Arc::new((self.factory)()?);
        sessions.insert(key.to_string(), pipeline.clone());
        info!("Created session {}", key);
        Ok(pipeline)
    }

    pub async fn get(&self, key: &str) -> Option<Arc<RagPipeline>> {
        self.sessions.read().await.get(key).cloned()
    }

    /// Drop a session and its document. Returns false if it did not exist.
    pub async fn remove(&self, key: &str) -> bool {
        let removed = self.sessions.write().await.remove(key).is_some();
        if removed {
            info!("Removed session {}", key);
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Session keys in sorted order
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.sessions.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}
