//! Format-dispatching text extractor

use async_trait::async_trait;
use tracing::debug;

use docqa_core::{Error, FileType, Result, TextExtractor};

use crate::docx::extract_docx_text;
use crate::pdf::extract_pdf_text;
use crate::text::decode_utf8;

/// Extractor for every supported [`FileType`].
///
/// PDF and DOCX decoding is CPU-bound and runs on the blocking pool.
#[derive(Debug, Clone, Default)]
pub struct DocumentExtractor;

impl DocumentExtractor {
    /// Create a new document extractor
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractor for DocumentExtractor {
    async fn extract(&self, bytes: &[u8], file_type: FileType) -> Result<String> {
        debug!("Extracting {} bytes as {}", bytes.len(), file_type);

        let text = match file_type {
            FileType::Text => decode_utf8(bytes)?,
            FileType::Pdf => {
                let bytes = bytes.to_vec();
                tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
                    .await
                    .map_err(|e| Error::Extraction(format!("Task join error: {e}")))??
            }
            FileType::Docx => {
                let bytes = bytes.to_vec();
                tokio::task::spawn_blocking(move || extract_docx_text(&bytes))
                    .await
                    .map_err(|e| Error::Extraction(format!("Task join error: {e}")))??
            }
        };

        if text.trim().is_empty() {
            return Ok(String::new());
        }
        Ok(text)
    }
}
