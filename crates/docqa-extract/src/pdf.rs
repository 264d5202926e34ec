//! PDF text extraction.
//!
//! Uses lopdf to pull the text of each page in page order.

use docqa_core::{Error, Result};
use lopdf::Document;
use tracing::{debug, warn};

/// Extract the text of every page, joined by newlines.
///
/// Pages whose content cannot be decoded are skipped with a warning; the
/// document only fails as a whole when it cannot be parsed or no page yields
/// text at all.
pub(crate) fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| Error::Extraction(format!("Failed to parse PDF: {e}")))?;

    if doc.is_encrypted() {
        return Err(Error::Extraction("PDF is encrypted".to_string()));
    }

    let pages = doc.get_pages();
    let mut texts = Vec::with_capacity(pages.len());
    let mut failed = 0usize;

    for page_num in pages.keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(text) => texts.push(text.trim_end().to_string()),
            Err(e) => {
                failed += 1;
                warn!("Failed to extract text from PDF page {}: {}", page_num, e);
            }
        }
    }

    if !pages.is_empty() && failed == pages.len() {
        return Err(Error::Extraction(format!(
            "No readable text in any of {} PDF pages",
            pages.len()
        )));
    }

    debug!("Extracted {} PDF pages ({} skipped)", texts.len(), failed);
    Ok(texts.join("\n"))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};

    /// Build a PDF with one line of Courier text per page
    pub(crate) fn pdf_bytes(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(24)]),
                    Operation::new("Td", vec![Object::Integer(72), Object::Integer(720)]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(595),
                    Object::Integer(842),
                ],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_pages_joined_in_order() {
        let bytes = pdf_bytes(&["Page one fever", "Page two cough"]);
        assert_eq!(extract_pdf_text(&bytes).unwrap(), "Page one fever\nPage two cough");
    }

    #[test]
    fn test_corrupt_pdf_is_extraction_error() {
        let err = extract_pdf_text(b"%PDF-1.4 this is not really a pdf").unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
        assert!(err.to_string().starts_with("Error extracting text:"));
    }

    #[test]
    fn test_empty_bytes_is_extraction_error() {
        assert!(matches!(extract_pdf_text(&[]), Err(Error::Extraction(_))));
    }
}
