//! Text generation adapter for articles and blog titles

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use async_trait::async_trait;
use genrelay_core::constants::BLOG_TITLE_MAX_TOKENS;
use genrelay_core::models::{Capability, GenerationRequest, ProviderOutput};

use crate::adapter::{unsupported_request, ProviderAdapter, ProviderResult};
use crate::chat::ChatCompletion;

/// Serves both text capabilities over the shared chat-completion backend.
/// Articles carry the caller's token budget; blog titles use a fixed one.
pub struct TextGenerationAdapter {
    chat: Arc<dyn ChatCompletion>,
}

impl Debug for TextGenerationAdapter {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("TextGenerationAdapter").finish()
    }
}

impl TextGenerationAdapter {
    pub fn new(chat: Arc<dyn ChatCompletion>) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl ProviderAdapter for TextGenerationAdapter {
    fn name(&self) -> &str {
        "text-generation"
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::Article, Capability::BlogTitle]
    }

    async fn invoke(&self, _user_id: &str, request: &GenerationRequest) -> ProviderResult {
        let (prompt, max_tokens) = match request {
            GenerationRequest::Article { prompt, max_tokens } => (prompt, *max_tokens),
            GenerationRequest::BlogTitle { prompt } => (prompt, BLOG_TITLE_MAX_TOKENS),
            other => return Err(unsupported_request(self.name(), other)),
        };

        let content = self.chat.complete(prompt, max_tokens).await?;
        Ok(ProviderOutput::Text(content))
    }
}
