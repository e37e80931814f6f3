//! Image endpoints: synthesis, background removal, object removal.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use genrelay_core::models::GenerationRequest;
use genrelay_core::AppError;
use serde::Deserialize;

use super::run_generation;
use crate::auth::RequestIdentity;
use crate::error::{ApiJson, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{read_multipart, StagedUpload};

#[derive(Debug, Deserialize)]
pub struct GenerateImageBody {
    pub prompt: String,
    #[serde(default)]
    pub publish: bool,
}

pub async fn generate_image(
    State(state): State<Arc<AppState>>,
    identity: RequestIdentity,
    ApiJson(body): ApiJson<GenerateImageBody>,
) -> Response {
    let request = GenerationRequest::ImageGeneration {
        prompt: body.prompt,
        publish: body.publish,
    };
    run_generation(&state, identity, request).await
}

pub async fn remove_image_background(
    State(state): State<Arc<AppState>>,
    identity: RequestIdentity,
    multipart: Multipart,
) -> Response {
    let parsed = match read_multipart(multipart, "image").await {
        Ok(parsed) => parsed,
        Err(err) => return HttpAppError(err).into_response(),
    };
    let Some((filename, data)) = parsed.file else {
        return HttpAppError(AppError::InvalidInput("No image uploaded.".to_string()))
            .into_response();
    };

    let staged =
        match StagedUpload::stage(state.config.upload_spool_dir.as_deref(), filename, data).await {
            Ok(staged) => staged,
            Err(err) => return HttpAppError(err).into_response(),
        };

    let request = GenerationRequest::BackgroundRemoval {
        image: staged.data.clone(),
        filename: staged.filename.clone(),
    };
    let response = run_generation(&state, identity, request).await;
    staged.discard();
    response
}

pub async fn remove_image_object(
    State(state): State<Arc<AppState>>,
    identity: RequestIdentity,
    multipart: Multipart,
) -> Response {
    let parsed = match read_multipart(multipart, "image").await {
        Ok(parsed) => parsed,
        Err(err) => return HttpAppError(err).into_response(),
    };
    let Some((filename, data)) = parsed.file else {
        return HttpAppError(AppError::InvalidInput("No image uploaded.".to_string()))
            .into_response();
    };
    let Some(object) = parsed.fields.get("object").cloned() else {
        return HttpAppError(AppError::InvalidInput(
            "Missing object to remove.".to_string(),
        ))
        .into_response();
    };

    let staged =
        match StagedUpload::stage(state.config.upload_spool_dir.as_deref(), filename, data).await {
            Ok(staged) => staged,
            Err(err) => return HttpAppError(err).into_response(),
        };

    let request = GenerationRequest::ObjectRemoval {
        image: staged.data.clone(),
        filename: staged.filename.clone(),
        object,
    };
    let response = run_generation(&state, identity, request).await;
    staged.discard();
    response
}
