//! Background removal adapter
//!
//! The supplied image is staged into durable object storage first, then sent
//! to the synchronous background-strip endpoint; the transformed result is
//! stored next to it. Upload and transform are two sequential awaited steps.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use genrelay_core::models::{Capability, GenerationRequest, ProviderOutput};
use genrelay_storage::Storage;
use uuid::Uuid;

use crate::adapter::{unsupported_request, ProviderAdapter, ProviderError, ProviderResult};

const REMOVE_BACKGROUND_PATH: &str = "/remove-background/v1";
const CLIENT_TIMEOUT_SECS: u64 = 120;

pub struct BackgroundRemovalAdapter {
    http_client: reqwest::Client,
    api_base: String,
    api_key: String,
    storage: Arc<dyn Storage>,
}

impl Debug for BackgroundRemovalAdapter {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("BackgroundRemovalAdapter")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl BackgroundRemovalAdapter {
    pub fn new(api_base: String, api_key: String, storage: Arc<dyn Storage>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(CLIENT_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client for background removal")?;

        Ok(Self {
            http_client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
            storage,
        })
    }

    async fn strip_background(
        &self,
        image: Vec<u8>,
        filename: &str,
    ) -> Result<Vec<u8>, ProviderError> {
        let part = reqwest::multipart::Part::bytes(image).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("image_file", part);

        let response = self
            .http_client
            .post(format!("{}{}", self.api_base, REMOVE_BACKGROUND_PATH))
            .header("x-api-key", &self.api_key)
            .multipart(form)
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

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        if bytes.is_empty() {
            return Err(ProviderError::MalformedResponse(
                "empty image body".to_string(),
            ));
        }

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ProviderAdapter for BackgroundRemovalAdapter {
    fn name(&self) -> &str {
        "background-removal"
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::BackgroundRemoval]
    }

    async fn invoke(&self, user_id: &str, request: &GenerationRequest) -> ProviderResult {
        let (image, filename) = match request {
            GenerationRequest::BackgroundRemoval { image, filename } => (image, filename),
            other => return Err(unsupported_request(self.name(), other)),
        };

        let start = std::time::Instant::now();

        // Stage the original before transforming it.
        let original_name = format!("{}-{}", Uuid::new_v4(), filename);
        let (original_key, _) = self
            .storage
            .upload(user_id, &original_name, "application/octet-stream", image.to_vec())
            .await?;

        let stripped = self.strip_background(image.to_vec(), filename).await?;

        let result_name = format!("{}.png", Uuid::new_v4());
        let (result_key, url) = self
            .storage
            .upload(user_id, &result_name, "image/png", stripped)
            .await?;

        tracing::info!(
            user_id = %user_id,
            original_key = %original_key,
            result_key = %result_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Background removed"
        );

        Ok(ProviderOutput::Url(url))
    }
}
