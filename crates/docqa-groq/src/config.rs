//! Groq configuration

use docqa_core::{Error, GenerationConfig, Result};
use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

/// Configuration for the Groq client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroqConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
}

impl GroqConfig {
    pub const DEFAULT_API_URL: &'static str = "https://api.groq.com/openai/v1";

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = env::var("GROQ_API_KEY").map_err(|_| {
            Error::Configuration("GROQ_API_KEY environment variable not found".to_string())
        })?;

        let api_url = env::var("GROQ_API_URL").unwrap_or_else(|_| Self::DEFAULT_API_URL.to_string());

        let model =
            env::var("GROQ_MODEL").unwrap_or_else(|_| GenerationConfig::DEFAULT_MODEL.to_string());

        let config = Self {
            api_key,
            api_url,
            model,
        };
        config.validate()?;
        Ok(config)
    }

    /// Create configuration with explicit values
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            api_url: Self::DEFAULT_API_URL.to_string(),
            model: GenerationConfig::DEFAULT_MODEL.to_string(),
        }
    }

    /// Point the client at another OpenAI-compatible endpoint
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Configuration("GROQ_API_KEY is empty".to_string()));
        }
        Url::parse(&self.api_url)
            .map_err(|e| Error::Configuration(format!("Invalid GROQ_API_URL '{}': {}", self.api_url, e)))?;
        Ok(())
    }

    /// Full URL of the chat completions endpoint
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_url.trim_end_matches('/'))
    }
}
