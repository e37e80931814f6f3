//! Document text extraction
//!
//! Extraction sits behind a trait so the review pipeline can be exercised
//! without real PDF bytes or a model call.

use std::fmt::Debug;

use crate::adapter::ProviderError;

/// Extracts plain text from a binary document.
pub trait DocumentExtractor: Send + Sync + Debug {
    fn extract_text(&self, data: &[u8]) -> Result<String, ProviderError>;
}

/// PDF text extraction via the `pdf-extract` crate: text runs are
/// concatenated in page order with decoded content, equivalent to the
/// page-by-page run concatenation of the upstream service contract.
#[derive(Debug, Default, Clone)]
pub struct PdfTextExtractor;

impl DocumentExtractor for PdfTextExtractor {
    fn extract_text(&self, data: &[u8]) -> Result<String, ProviderError> {
        pdf_extract::extract_text_from_mem(data).map_err(|e| {
            ProviderError::InvalidInput(format!("Could not read document: {}", e))
        })
    }
}
