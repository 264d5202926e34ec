//! Grounded answer generation

use std::sync::Arc;

use tracing::{debug, warn};

use docqa_core::{Answer, GenerationConfig, LLMProvider, ScoredChunk};

/// Join retrieved chunk texts into the context block, in retrieval order
pub fn build_context(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .map(|hit| hit.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Fill the answer prompt. Placeholders are substituted in a single pass so
/// text inside `context` is never re-interpreted.
pub fn render_prompt(context: &str, question: &str) -> String {
    format!(
        r#"You are a medical assistant. Based on the provided medical context, answer the user's question accurately.

Medical Context:
{context}

User Question: {question}

Instructions:
1. Answer based ONLY on the given context.
2. If answer is not present, say: "I don't have enough information."
3. Always advise consulting a healthcare professional.

Answer:
"#
    )
}

/// Produces answers from retrieved context with an [`LLMProvider`]
pub struct AnswerGenerator {
    llm: Arc<dyn LLMProvider>,
    config: GenerationConfig,
}

impl AnswerGenerator {
    /// Generator using the provider's model with default sampling settings
    pub fn new(llm: Arc<dyn LLMProvider>) -> Self {
        let config = GenerationConfig {
            model_id: llm.model_id().to_string(),
            ..Default::default()
        };
        Self { llm, config }
    }

    pub fn with_config(llm: Arc<dyn LLMProvider>, config: GenerationConfig) -> Self {
        Self { llm, config }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Answer `question` from `chunks`.
    ///
    /// No chunks means no model call. Provider errors become [`Answer::Failed`].
    pub async fn generate(&self, question: &str, chunks: &[ScoredChunk]) -> Answer {
        if chunks.is_empty() {
            debug!("No context retrieved, skipping generation");
            return Answer::Insufficient;
        }

        let prompt = render_prompt(&build_context(chunks), question);
        match self.llm.generate_with_config(&prompt, &self.config).await {
            Ok(result) => Answer::Generated {
                text: result.text,
                model_id: result.model_id,
            },
            Err(e) => {
                warn!("Answer generation failed: {}", e);
                Answer::Failed {
                    message: format!("Error generating answer: {}", e),
                }
            }
        }
    }
}
