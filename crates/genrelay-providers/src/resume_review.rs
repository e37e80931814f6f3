//! Resume review adapter
//!
//! Extracts plain text from the uploaded document, gates on a minimum useful
//! length, then forwards the text inside a structured review prompt to the
//! chat-completion backend.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use async_trait::async_trait;
use genrelay_core::constants::{MIN_REVIEW_TEXT_CHARS, RESUME_REVIEW_MAX_TOKENS};
use genrelay_core::models::{Capability, GenerationRequest, ProviderOutput};

use crate::adapter::{unsupported_request, ProviderAdapter, ProviderError, ProviderResult};
use crate::chat::ChatCompletion;
use crate::extract::DocumentExtractor;

pub struct ResumeReviewAdapter {
    extractor: Arc<dyn DocumentExtractor>,
    chat: Arc<dyn ChatCompletion>,
}

impl Debug for ResumeReviewAdapter {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ResumeReviewAdapter").finish()
    }
}

fn review_prompt(resume_text: &str) -> String {
    format!(
        "You are a professional HR and career consultant.\n\
         \n\
         Review the following resume and provide:\n\
         \n\
         - **Summary**\n\
         - **Strengths**\n\
         - **Weaknesses**\n\
         - **Recommendations**\n\
         \n\
         Resume Content:\n\
         {}",
        resume_text
    )
}

impl ResumeReviewAdapter {
    pub fn new(extractor: Arc<dyn DocumentExtractor>, chat: Arc<dyn ChatCompletion>) -> Self {
        Self { extractor, chat }
    }
}

#[async_trait]
impl ProviderAdapter for ResumeReviewAdapter {
    fn name(&self) -> &str {
        "resume-review"
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::ResumeReview]
    }

    async fn invoke(&self, user_id: &str, request: &GenerationRequest) -> ProviderResult {
        let document = match request {
            GenerationRequest::ResumeReview { document, .. } => document,
            other => return Err(unsupported_request(self.name(), other)),
        };

        // Extraction is CPU-bound; keep it off the async workers.
        let extractor = self.extractor.clone();
        let data = document.clone();
        let text = tokio::task::spawn_blocking(move || extractor.extract_text(&data))
            .await
            .map_err(|e| ProviderError::Transport(format!("extraction task failed: {}", e)))??;

        let trimmed = text.trim();
        if trimmed.chars().count() < MIN_REVIEW_TEXT_CHARS {
            // Too little to review; no model call happens on this path.
            return Err(ProviderError::InvalidInput(
                "Resume text is empty or too short.".to_string(),
            ));
        }

        tracing::debug!(
            user_id = %user_id,
            extracted_chars = trimmed.chars().count(),
            "Extracted resume text, requesting review"
        );

        let content = self
            .chat
            .complete(&review_prompt(trimmed), RESUME_REVIEW_MAX_TOKENS)
            .await?;

        let content = content.trim();
        let content = if content.is_empty() {
            "No response generated.".to_string()
        } else {
            content.to_string()
        };

        Ok(ProviderOutput::Text(content))
    }
}
