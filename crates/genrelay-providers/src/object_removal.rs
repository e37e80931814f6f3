//! Object removal adapter
//!
//! Uploads the image to the transformation CDN, then composes the
//! derived-asset URL that applies the generative inpainting erase for the
//! named object. The CDN renders the derived asset on first fetch.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use genrelay_core::models::{Capability, GenerationRequest, ProviderOutput};
use genrelay_core::validation::validate_object_name;
use genrelay_core::ErrorMetadata;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;

use crate::adapter::{unsupported_request, ProviderAdapter, ProviderError, ProviderResult};

const CLIENT_TIMEOUT_SECS: u64 = 120;

pub struct ObjectRemovalAdapter {
    http_client: reqwest::Client,
    api_base: String,
    delivery_base: String,
    cloud_name: String,
    upload_preset: String,
}

impl Debug for ObjectRemovalAdapter {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ObjectRemovalAdapter")
            .field("api_base", &self.api_base)
            .field("cloud_name", &self.cloud_name)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
}

impl ObjectRemovalAdapter {
    pub fn new(
        api_base: String,
        delivery_base: String,
        cloud_name: String,
        upload_preset: String,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(CLIENT_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client for object removal")?;

        Ok(Self {
            http_client,
            api_base: api_base.trim_end_matches('/').to_string(),
            delivery_base: delivery_base.trim_end_matches('/').to_string(),
            cloud_name,
            upload_preset,
        })
    }

    /// Upload the original to the CDN, returning its public id.
    async fn upload_image(
        &self,
        image: Vec<u8>,
        filename: &str,
    ) -> Result<String, ProviderError> {
        let part = reqwest::multipart::Part::bytes(image).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone());

        let response = self
            .http_client
            .post(format!("{}/{}/image/upload", self.api_base, self.cloud_name))
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

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        Ok(parsed.public_id)
    }

    /// Compose the derived-asset URL applying the inpainting erase.
    fn derived_url(&self, public_id: &str, object: &str) -> String {
        let encoded = utf8_percent_encode(object, NON_ALPHANUMERIC);
        format!(
            "{}/{}/image/upload/e_gen_remove:prompt_{}/{}",
            self.delivery_base, self.cloud_name, encoded, public_id
        )
    }
}

#[async_trait]
impl ProviderAdapter for ObjectRemovalAdapter {
    fn name(&self) -> &str {
        "object-removal"
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::ObjectRemoval]
    }

    async fn invoke(&self, user_id: &str, request: &GenerationRequest) -> ProviderResult {
        let (image, filename, object) = match request {
            GenerationRequest::ObjectRemoval {
                image,
                filename,
                object,
            } => (image, filename, object),
            other => return Err(unsupported_request(self.name(), other)),
        };

        // Single-token constraint holds at this boundary too; nothing is
        // uploaded for a malformed object name.
        validate_object_name(object)
            .map_err(|e| ProviderError::InvalidInput(e.client_message()))?;

        let start = std::time::Instant::now();
        let public_id = self.upload_image(image.to_vec(), filename).await?;
        let url = self.derived_url(&public_id, object.trim());

        tracing::info!(
            user_id = %user_id,
            public_id = %public_id,
            object = %object,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Composed object-removal URL"
        );

        Ok(ProviderOutput::Url(url))
    }
}
