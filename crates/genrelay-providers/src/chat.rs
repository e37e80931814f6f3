//! Chat-completion client for OpenAI-compatible endpoints
//!
//! The hosted language model is reached through its OpenAI-compatible
//! chat-completions surface, so the same client serves any backend exposing
//! that wire format.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::adapter::ProviderError;
use genrelay_core::constants::CHAT_TEMPERATURE;

const CLIENT_TIMEOUT_SECS: u64 = 120;

/// Seam over the hosted language model, so review and text-generation logic
/// can be exercised without a network call.
#[async_trait]
pub trait ChatCompletion: Send + Sync + Debug {
    /// Send one user prompt and return the model's reply text.
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, ProviderError>;
}

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiCompatClient {
    http_client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl Debug for OpenAiCompatClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("OpenAiCompatClient")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

// Chat-completions request/response structures
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiCompatClient {
    pub fn new(api_base: String, api_key: String, model: String) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(CLIENT_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client for chat completions")?;

        Ok(Self {
            http_client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }
}

#[async_trait]
impl ChatCompletion for OpenAiCompatClient {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, ProviderError> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: CHAT_TEMPERATURE,
            max_tokens,
        };

        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::Remote {
                status: status.as_u16(),
                detail,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                ProviderError::MalformedResponse("response contained no choices".to_string())
            })?;

        tracing::debug!(
            model = %self.model,
            max_tokens,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Chat completion finished"
        );

        Ok(content)
    }
}
