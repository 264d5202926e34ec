//! Document and chunk types, plus the text extractor trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Error, Result};

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
    /// Portable Document Format
    Pdf,
    /// Office Open XML word processing document
    Docx,
    /// UTF-8 plain text
    Text,
}

impl FileType {
    /// Canonical file extension for this type
    pub fn extension(&self) -> &'static str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Docx => "docx",
            FileType::Text => "txt",
        }
    }

    /// Parse a type tag such as `pdf` or `TXT`
    pub fn parse(tag: &str) -> Result<FileType> {
        match tag.trim().trim_start_matches('.').to_lowercase().as_str() {
            "pdf" => Ok(FileType::Pdf),
            "docx" => Ok(FileType::Docx),
            "txt" | "text" | "md" => Ok(FileType::Text),
            other => Err(Error::UnsupportedFileType(other.to_string())),
        }
    }

    /// Infer the type from a path's extension
    pub fn from_path(path: &Path) -> Result<FileType> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| Error::UnsupportedFileType(path.display().to_string()))?;
        Self::parse(ext)
    }
}

impl std::str::FromStr for FileType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// An ordered slice of the extracted text.
///
/// `start` and `end` are char offsets into the source text, so consecutive
/// chunks can be stitched back together by dropping the shared prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    pub index: usize,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl TextChunk {
    /// Number of chars in this chunk
    pub fn char_len(&self) -> usize {
        self.end - self.start
    }
}

/// Trait for turning raw document bytes into plain text
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract the textual content of a document, parts joined by newlines.
    ///
    /// Whitespace-only documents yield an empty string rather than an error.
    async fn extract(&self, bytes: &[u8], file_type: FileType) -> Result<String>;
}
