//! End-to-end tests for the RAG pipeline

#[cfg(test)]
mod pipeline_tests {
    use crate::{
        Answer, Embedder, Error, FileType, LLMProvider, PipelineState, RagConfig, RagPipeline,
        Result, SessionRegistry,
    };
    use async_trait::async_trait;
    use docqa_core::{GenerationConfig, GenerationResult, INSUFFICIENT_INFORMATION, NO_CONTEXT_ANSWER};
    use docqa_embed::HashEmbedder;
    use insta::assert_yaml_snapshot;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const FEVER_NOTE: &str = "Patient has mild fever.";
    const FEVER_ANSWER: &str =
        "The patient has a mild fever. Please consult a healthcare professional.";

    /// Answers from the fever note when it appears in the prompt, otherwise
    /// declines. Counts calls so tests can assert the model was skipped.
    struct StubLlm {
        calls: AtomicUsize,
        last_prompt: Mutex<Option<String>>,
    }

    impl StubLlm {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_prompt(&self) -> String {
            self.last_prompt.lock().unwrap().clone().unwrap_or_default()
        }
    }

    #[async_trait]
    impl LLMProvider for StubLlm {
        async fn generate(&self, prompt: &str) -> Result<GenerationResult> {
            self.generate_with_config(prompt, &GenerationConfig::default()).await
        }

        async fn generate_with_config(
            &self,
            prompt: &str,
            config: &GenerationConfig,
        ) -> Result<GenerationResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());

            let text = if prompt.contains(FEVER_NOTE) {
                FEVER_ANSWER
            } else {
                INSUFFICIENT_INFORMATION
            };
            Ok(GenerationResult {
                text: text.to_string(),
                model_id: config.model_id.clone(),
                tokens_used: None,
            })
        }

        fn model_id(&self) -> &str {
            "stub-llm"
        }
    }

    fn embedder() -> Arc<dyn Embedder> {
        Arc::new(HashEmbedder::new(256).unwrap())
    }

    fn pipeline(llm: Arc<StubLlm>) -> RagPipeline {
        RagPipeline::with_document_extractor(&RagConfig::default(), embedder(), llm).unwrap()
    }

    fn ready_doc_id(pipeline: &RagPipeline) -> String {
        match pipeline.state() {
            PipelineState::Ready { doc_id } => doc_id,
            PipelineState::Empty => panic!("expected an indexed document"),
        }
    }

    #[tokio::test]
    async fn test_fever_question_is_answered_from_document() {
        let llm = StubLlm::new();
        let pipeline = pipeline(llm.clone());

        let report = pipeline.ingest(FEVER_NOTE.as_bytes(), FileType::Text).await.unwrap();
        assert_eq!(report.chunk_count, 1);
        assert_eq!(ready_doc_id(&pipeline), report.doc_id);

        let answer = pipeline.ask("Does the patient have a fever?").await;
        assert!(answer.text().contains("fever"));
        assert!(!answer.is_insufficient());
        assert_eq!(llm.calls(), 1);
        assert!(llm.last_prompt().contains(FEVER_NOTE));

        assert_yaml_snapshot!(answer, @r"
        kind: generated
        text: The patient has a mild fever. Please consult a healthcare professional.
        model_id: stub-llm
        ");
    }

    #[tokio::test]
    async fn test_ingest_report_snapshot() {
        let pipeline = pipeline(StubLlm::new());
        let report = pipeline.ingest(FEVER_NOTE.as_bytes(), FileType::Text).await.unwrap();

        assert_yaml_snapshot!(report, {
            ".doc_id" => "[doc_id]",
        }, @r#"
        doc_id: "[doc_id]"
        chunk_count: 1
        "#);
    }

    #[tokio::test]
    async fn test_ask_before_ingest_skips_model() {
        let llm = StubLlm::new();
        let pipeline = pipeline(llm.clone());

        assert_eq!(pipeline.state(), PipelineState::Empty);
        let answer = pipeline.ask("Does the patient have a fever?").await;

        assert_eq!(answer, Answer::Insufficient);
        assert_eq!(answer.text(), NO_CONTEXT_ANSWER);
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_file_keeps_previous_document() {
        let pipeline = pipeline(StubLlm::new());
        let report = pipeline.ingest(FEVER_NOTE.as_bytes(), FileType::Text).await.unwrap();

        let mut file = tempfile::Builder::new().suffix(".exe").tempfile().unwrap();
        file.write_all(b"MZ\x90\x00").unwrap();

        let result = pipeline.ingest_file(file.path()).await;
        assert!(matches!(result, Err(Error::UnsupportedFileType(ref ext)) if ext == "exe"));
        assert_eq!(ready_doc_id(&pipeline), report.doc_id);
    }

    #[tokio::test]
    async fn test_failed_ingests_keep_previous_document() {
        let llm = StubLlm::new();
        let pipeline = pipeline(llm.clone());
        let report = pipeline.ingest(FEVER_NOTE.as_bytes(), FileType::Text).await.unwrap();

        let empty = pipeline.ingest(b"   \n\n  ", FileType::Text).await.unwrap();
        assert_eq!(empty.chunk_count, 0);
        assert!(empty.is_empty());
        assert_ne!(empty.doc_id, report.doc_id);

        let corrupt = pipeline.ingest(b"not a pdf at all", FileType::Pdf).await;
        assert!(matches!(corrupt, Err(Error::Extraction(_))));

        let binary = pipeline.ingest(&[0xff, 0xfe, 0x00, 0x81], FileType::Text).await;
        assert!(binary.is_err());

        assert_eq!(ready_doc_id(&pipeline), report.doc_id);
        let answer = pipeline.ask("Does the patient have a fever?").await;
        assert!(answer.text().contains("fever"));
    }

    #[tokio::test]
    async fn test_textless_document_reports_zero_chunks() {
        let llm = StubLlm::new();
        let pipeline = pipeline(llm.clone());

        let report = pipeline.ingest(b"\n\t  \n", FileType::Text).await.unwrap();
        assert_eq!(report.chunk_count, 0);
        assert_eq!(pipeline.state(), PipelineState::Empty);

        let answer = pipeline.ask("Does the patient have a fever?").await;
        assert_eq!(answer, Answer::Insufficient);
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_reset_clears_document() {
        let llm = StubLlm::new();
        let pipeline = pipeline(llm.clone());
        pipeline.ingest(FEVER_NOTE.as_bytes(), FileType::Text).await.unwrap();

        pipeline.reset();
        assert_eq!(pipeline.state(), PipelineState::Empty);
        assert!(pipeline.index_summary().is_none());

        let answer = pipeline.ask("Does the patient have a fever?").await;
        assert_eq!(answer.text(), NO_CONTEXT_ANSWER);
        assert_eq!(llm.calls(), 0);

        // Resetting twice is harmless
        pipeline.reset();
        assert_eq!(pipeline.state(), PipelineState::Empty);
    }

    #[tokio::test]
    async fn test_second_ingest_replaces_first() {
        let llm = StubLlm::new();
        let pipeline = pipeline(llm.clone());

        let first = pipeline.ingest(FEVER_NOTE.as_bytes(), FileType::Text).await.unwrap();
        let second = pipeline
            .ingest(b"Invoice total is forty two dollars.", FileType::Text)
            .await
            .unwrap();
        assert_ne!(first.doc_id, second.doc_id);
        assert_eq!(ready_doc_id(&pipeline), second.doc_id);

        let answer = pipeline.ask("Does the patient have a fever?").await;
        assert!(answer.is_insufficient());
        assert!(!llm.last_prompt().contains(FEVER_NOTE));
        assert!(llm.last_prompt().contains("Invoice total"));
    }

    #[tokio::test]
    async fn test_long_document_is_chunked() {
        let pipeline = pipeline(StubLlm::new());
        let text = "The medication should be taken twice daily with food. ".repeat(100);

        let report = pipeline.ingest(text.as_bytes(), FileType::Text).await.unwrap();
        assert!(report.chunk_count > 1);

        let summary = pipeline.index_summary().unwrap();
        assert_eq!(summary.chunk_count, report.chunk_count);
        assert_eq!(summary.dimension, 256);
        assert_eq!(summary.model_id, "hash-embedder");
    }

    #[tokio::test]
    async fn test_ingest_text_file() {
        let llm = StubLlm::new();
        let pipeline = pipeline(llm.clone());

        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "{}", FEVER_NOTE).unwrap();

        let report = pipeline.ingest_file(file.path()).await.unwrap();
        assert_eq!(report.chunk_count, 1);
        assert!(pipeline.ask("fever?").await.text().contains("fever"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RagConfig {
            chunk_size: 100,
            chunk_overlap: 100,
            ..Default::default()
        };
        assert!(RagPipeline::with_document_extractor(&config, embedder(), StubLlm::new()).is_err());
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let embedder = embedder();
        let llm = StubLlm::new();
        let factory_llm = llm.clone();
        let registry = SessionRegistry::new(move || {
            RagPipeline::with_document_extractor(
                &RagConfig::default(),
                embedder.clone(),
                factory_llm.clone(),
            )
        });

        let alice = registry.session("alice").await.unwrap();
        alice.ingest(FEVER_NOTE.as_bytes(), FileType::Text).await.unwrap();

        let bob = registry.session("bob").await.unwrap();
        assert_eq!(bob.state(), PipelineState::Empty);
        assert_eq!(bob.ask("Does the patient have a fever?").await, Answer::Insufficient);
        assert_eq!(llm.calls(), 0);

        let again = registry.session("alice").await.unwrap();
        assert!(Arc::ptr_eq(&alice, &again));
        assert!(again.state().is_ready());

        assert_eq!(registry.keys().await, vec!["alice".to_string(), "bob".to_string()]);
        assert!(registry.remove("alice").await);
        assert!(!registry.remove("alice").await);
        assert_eq!(registry.len().await, 1);
        assert!(registry.get("alice").await.is_none());

        // A new session under the same key starts empty
        let fresh = registry.session("alice").await.unwrap();
        assert_eq!(fresh.state(), PipelineState::Empty);
    }
}
