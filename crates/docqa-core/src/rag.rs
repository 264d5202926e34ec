//! Answer and pipeline state types shared by the RAG engine and its hosts

use serde::{Deserialize, Serialize};

/// Sentence the model is instructed to use when the context lacks the answer
pub const INSUFFICIENT_INFORMATION: &str = "I don't have enough information.";

/// Fixed answer returned when retrieval finds nothing to ground an answer on
pub const NO_CONTEXT_ANSWER: &str =
    "I don't have enough information. Please upload and process a document.";

/// Outcome of answering a question.
///
/// Failures are carried as a variant rather than an error so that callers
/// always have text to show, while tests can still tell the cases apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Answer {
    /// Text produced by the language model
    Generated { text: String, model_id: String },
    /// Retrieval returned no chunks; the model was not called
    Insufficient,
    /// Retrieval or generation failed
    Failed { message: String },
}

impl Answer {
    /// Plain text shown at the outer boundary
    pub fn text(&self) -> &str {
        match self {
            Answer::Generated { text, .. } => text,
            Answer::Insufficient => NO_CONTEXT_ANSWER,
            Answer::Failed { message } => message,
        }
    }

    /// True when no answer could be grounded in the document
    pub fn is_insufficient(&self) -> bool {
        match self {
            Answer::Insufficient => true,
            Answer::Generated { text, .. } => text.trim_start().starts_with(INSUFFICIENT_INFORMATION),
            Answer::Failed { .. } => false,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Answer::Failed { .. })
    }
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text())
    }
}

/// Summary of a successful ingest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub doc_id: String,
    pub chunk_count: usize,
}

impl IngestReport {
    /// True when the document had no text and nothing was indexed
    pub fn is_empty(&self) -> bool {
        self.chunk_count == 0
    }
}

/// Whether a pipeline currently has a document to answer from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineState {
    Empty,
    Ready { doc_id: String },
}

impl PipelineState {
    pub fn is_ready(&self) -> bool {
        matches!(self, PipelineState::Ready { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_renders_sentinel() {
        let answer = Answer::Insufficient;
        assert_eq!(answer.text(), NO_CONTEXT_ANSWER);
        assert_eq!(answer.to_string(), NO_CONTEXT_ANSWER);
        assert!(answer.is_insufficient());
        assert!(!answer.is_failed());
    }

    #[test]
    fn test_generated_insufficient_detection() {
        let answer = Answer::Generated {
            text: "I don't have enough information. Please consult a doctor.".to_string(),
            model_id: "m".to_string(),
        };
        assert!(answer.is_insufficient());

        let answer = Answer::Generated {
            text: "The patient has a mild fever.".to_string(),
            model_id: "m".to_string(),
        };
        assert!(!answer.is_insufficient());
    }

    #[test]
    fn test_failed_answer_is_plain_text() {
        let answer = Answer::Failed {
            message: "Error generating answer: timeout".to_string(),
        };
        assert!(answer.is_failed());
        assert!(!answer.is_insufficient());
        assert_eq!(answer.text(), "Error generating answer: timeout");
    }
}
