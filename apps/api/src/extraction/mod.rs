//! Extraction: turns a submitted document into raw text plus contact details.
//!
//! File-format decoding is delegated to `pdf-extract`; this module only decides
//! which decoder to use and refuses to hand an empty document downstream.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod contact;

pub use contact::{extract_contact_info, ContactInfo};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to read PDF: {0}")]
    Pdf(String),

    #[error("Uploaded text is not valid UTF-8")]
    NotUtf8,

    #[error("Document contains no extractable text")]
    EmptyDocument,
}

/// The document as submitted. PDF bytes are not echoed back in the workflow context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResumeInput {
    Text {
        text: String,
    },
    Pdf {
        file_name: Option<String>,
        #[serde(skip)]
        bytes: Vec<u8>,
    },
}

impl ResumeInput {
    /// Classifies an uploaded file by content type, falling back to the `%PDF` magic.
    pub fn from_upload(
        file_name: Option<String>,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<Self, ExtractionError> {
        let is_pdf = content_type == Some("application/pdf") || bytes.starts_with(b"%PDF");
        if is_pdf {
            return Ok(Self::Pdf { file_name, bytes });
        }
        let text = String::from_utf8(bytes).map_err(|_| ExtractionError::NotUtf8)?;
        Ok(Self::Text { text })
    }
}

/// Output of the extraction stage and input of the analysis stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub raw_text: String,
    pub contact_info: ContactInfo,
    /// Structured sections recovered from the document; currently always an empty object.
    #[serde(default = "empty_object")]
    pub structured_data: serde_json::Value,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Extracts raw text and contact info. CPU-bound for PDFs; run it off the async executor.
pub fn extract_document(input: &ResumeInput) -> Result<ExtractedDocument, ExtractionError> {
    let raw_text = match input {
        ResumeInput::Text { text } => text.clone(),
        ResumeInput::Pdf { bytes, .. } => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractionError::Pdf(e.to_string()))?,
    };

    if raw_text.trim().is_empty() {
        return Err(ExtractionError::EmptyDocument);
    }

    let contact_info = extract_contact_info(&raw_text);

    Ok(ExtractedDocument {
        raw_text,
        contact_info,
        structured_data: empty_object(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_input_is_passed_through() {
        let input = ResumeInput::Text {
            text: "Jane Doe\njane@example.com\nPython developer".to_string(),
        };
        let doc = extract_document(&input).unwrap();
        assert!(doc.raw_text.contains("Python developer"));
        assert_eq!(doc.contact_info.email.as_deref(), Some("jane@example.com"));
        assert_eq!(doc.structured_data, serde_json::json!({}));
    }

    #[test]
    fn test_blank_text_is_an_error_not_empty_success() {
        let input = ResumeInput::Text {
            text: "   \n\t ".to_string(),
        };
        assert!(matches!(
            extract_document(&input),
            Err(ExtractionError::EmptyDocument)
        ));
    }

    #[test]
    fn test_upload_classification() {
        let pdf = ResumeInput::from_upload(None, None, b"%PDF-1.7...".to_vec()).unwrap();
        assert!(matches!(pdf, ResumeInput::Pdf { .. }));

        let text =
            ResumeInput::from_upload(Some("cv.txt".into()), Some("text/plain"), b"hello".to_vec())
                .unwrap();
        assert!(matches!(text, ResumeInput::Text { ref text } if text == "hello"));

        let bad = ResumeInput::from_upload(None, Some("text/plain"), vec![0xff, 0xfe, 0x00]);
        assert!(matches!(bad, Err(ExtractionError::NotUtf8)));
    }

    #[test]
    fn test_pdf_bytes_are_not_serialized() {
        let input = ResumeInput::Pdf {
            file_name: Some("cv.pdf".to_string()),
            bytes: vec![1, 2, 3],
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value, serde_json::json!({"kind": "pdf", "file_name": "cv.pdf"}));
    }
}
