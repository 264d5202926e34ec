//! Snapshot tests for core types

#[cfg(test)]
mod snapshot_tests {
    use crate::{Answer, IngestReport, RagConfig};
    use insta::assert_yaml_snapshot;

    #[test]
    fn test_default_config_snapshot() {
        assert_yaml_snapshot!(RagConfig::default(), @r"
        chunk_size: 1000
        chunk_overlap: 200
        top_k: 4
        embed_batch_size: 32
        ");
    }

    #[test]
    fn test_answer_snapshots() {
        let generated = Answer::Generated {
            text: "The patient has a mild fever.".to_string(),
            model_id: "llama-3.1-8b-instant".to_string(),
        };
        assert_yaml_snapshot!(generated, @r"
        kind: generated
        text: The patient has a mild fever.
        model_id: llama-3.1-8b-instant
        ");

        assert_yaml_snapshot!(Answer::Insufficient, @"kind: insufficient");
    }

    #[test]
    fn test_ingest_report_snapshot() {
        let report = IngestReport {
            doc_id: "1a2b3c4d".to_string(),
            chunk_count: 3,
        };
        assert_yaml_snapshot!(report, @r"
        doc_id: 1a2b3c4d
        chunk_count: 3
        ");
    }
}
