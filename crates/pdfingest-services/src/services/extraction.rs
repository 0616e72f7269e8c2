//! PDF text extraction.
//!
//! Extraction never fails from the caller's point of view: parse errors, parser panics
//! and PDFs without a text layer all produce a placeholder naming the file.

use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("PDF parse failed: {0}")]
    Parse(String),

    #[error("extraction task failed: {0}")]
    Task(String),
}

#[async_trait]
pub trait TextExtraction: Send + Sync {
    /// Text content of the PDF, or a placeholder when none can be read.
    async fn extract(&self, file_name: &str, data: Bytes) -> String;
}

/// Placeholder recorded when the PDF cannot be parsed at all.
pub fn unreadable_placeholder(file_name: &str) -> String {
    format!(
        "PDF file: {} (Text extraction not available - PDF may be scanned, encrypted, or in unsupported format)",
        file_name
    )
}

/// Placeholder recorded when the PDF parses but carries no text.
pub fn empty_placeholder(file_name: &str) -> String {
    format!(
        "PDF file: {} (No text content found - PDF may be image-based or scanned)",
        file_name
    )
}

/// Text extractor backed by `pdf-extract`, run on the blocking pool.
#[derive(Debug, Clone, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }

    async fn try_extract(data: Bytes) -> Result<String, ExtractionError> {
        // A parser panic surfaces as a JoinError.
        tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&data)
                .map_err(|e| ExtractionError::Parse(e.to_string()))
        })
        .await
        .map_err(|e| ExtractionError::Task(e.to_string()))?
    }
}

/// Map an extraction outcome to the text that gets recorded.
pub fn resolve_extracted_text(file_name: &str, result: Result<String, ExtractionError>) -> String {
    match result {
        Ok(text) => {
            let text = text.trim();
            if text.is_empty() {
                tracing::warn!(file_name = %file_name, "PDF contains no extractable text");
                empty_placeholder(file_name)
            } else {
                text.to_string()
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, file_name = %file_name, "PDF text extraction failed");
            unreadable_placeholder(file_name)
        }
    }
}

#[async_trait]
impl TextExtraction for PdfTextExtractor {
    async fn extract(&self, file_name: &str, data: Bytes) -> String {
        let start = std::time::Instant::now();
        let result = Self::try_extract(data).await;
        let text = resolve_extracted_text(file_name, result);

        tracing::debug!(
            file_name = %file_name,
            text_length = text.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "PDF text extraction finished"
        );

        text
    }
}
