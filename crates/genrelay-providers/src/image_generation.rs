//! Image synthesis adapter
//!
//! Converts a text prompt into a rendered image via a ClipDrop-style
//! text-to-image endpoint, then relocates the binary result into durable
//! object storage and returns its public reference.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use genrelay_core::models::{Capability, GenerationRequest, ProviderOutput};
use genrelay_storage::Storage;
use uuid::Uuid;

use crate::adapter::{unsupported_request, ProviderAdapter, ProviderError, ProviderResult};

const TEXT_TO_IMAGE_PATH: &str = "/text-to-image/v1";
const CLIENT_TIMEOUT_SECS: u64 = 120;

pub struct ImageGenerationAdapter {
    http_client: reqwest::Client,
    api_base: String,
    api_key: String,
    storage: Arc<dyn Storage>,
}

impl Debug for ImageGenerationAdapter {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ImageGenerationAdapter")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl ImageGenerationAdapter {
    pub fn new(api_base: String, api_key: String, storage: Arc<dyn Storage>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(CLIENT_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client for image generation")?;

        Ok(Self {
            http_client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
            storage,
        })
    }

    async fn render(&self, prompt: &str) -> Result<Vec<u8>, ProviderError> {
        let form = reqwest::multipart::Form::new().text("prompt", prompt.to_string());

        let response = self
            .http_client
            .post(format!("{}{}", self.api_base, TEXT_TO_IMAGE_PATH))
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
impl ProviderAdapter for ImageGenerationAdapter {
    fn name(&self) -> &str {
        "image-generation"
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::ImageGeneration]
    }

    async fn invoke(&self, user_id: &str, request: &GenerationRequest) -> ProviderResult {
        let prompt = match request {
            GenerationRequest::ImageGeneration { prompt, .. } => prompt,
            other => return Err(unsupported_request(self.name(), other)),
        };

        let start = std::time::Instant::now();
        let image = self.render(prompt).await?;

        let filename = format!("{}.png", Uuid::new_v4());
        let (key, url) = self
            .storage
            .upload(user_id, &filename, "image/png", image)
            .await?;

        tracing::info!(
            user_id = %user_id,
            storage_key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Generated image relocated to storage"
        );

        Ok(ProviderOutput::Url(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genrelay_storage::LocalStorage;
    use tempfile::TempDir;

    async fn adapter_for(
        server: &mockito::ServerGuard,
    ) -> (ImageGenerationAdapter, Arc<LocalStorage>, TempDir) {
        let dir = TempDir::new().unwrap();
        let storage = Arc::new(
            LocalStorage::new(dir.path(), "http://localhost:3000/media".to_string())
                .await
                .unwrap(),
        );
        let adapter = ImageGenerationAdapter::new(
            server.url(),
            "test-key".to_string(),
            storage.clone(),
        )
        .unwrap();
        (adapter, storage, dir)
    }

    #[tokio::test]
    async fn test_invoke_relocates_image_to_storage() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", TEXT_TO_IMAGE_PATH)
            .match_header("x-api-key", "test-key")
            .with_status(200)
            .with_body(b"\x89PNG fake image bytes".as_slice())
            .create_async()
            .await;

        let (adapter, storage, _dir) = adapter_for(&server).await;
        let request = GenerationRequest::ImageGeneration {
            prompt: "a lighthouse at dusk".to_string(),
            publish: true,
        };

        let output = adapter.invoke("user_1", &request).await.unwrap();
        mock.assert_async().await;

        let url = match output {
            ProviderOutput::Url(url) => url,
            other => panic!("expected Url output, got {:?}", other),
        };
        assert!(url.starts_with("http://localhost:3000/media/generations/user_1/"));

        // The relocated bytes match what the remote service rendered.
        let key = url
            .strip_prefix("http://localhost:3000/media/")
            .unwrap()
            .to_string();
        let stored = storage.download(&key).await.unwrap();
        assert_eq!(stored, b"\x89PNG fake image bytes");
    }

    #[tokio::test]
    async fn test_remote_failure_uploads_nothing() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", TEXT_TO_IMAGE_PATH)
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let (adapter, _storage, dir) = adapter_for(&server).await;
        let request = GenerationRequest::ImageGeneration {
            prompt: "a lighthouse".to_string(),
            publish: false,
        };

        assert!(matches!(
            adapter.invoke("user_1", &request).await,
            Err(ProviderError::Remote { status: 502, .. })
        ));

        // No orphaned artifact for a failed render.
        let staged = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(staged, 0);
    }
}
