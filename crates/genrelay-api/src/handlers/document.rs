//! Document review endpoint.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use genrelay_core::models::GenerationRequest;
use genrelay_core::AppError;

use super::run_generation;
use crate::auth::RequestIdentity;
use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::{read_multipart, StagedUpload};

pub async fn review_resume(
    State(state): State<Arc<AppState>>,
    identity: RequestIdentity,
    multipart: Multipart,
) -> Response {
    let parsed = match read_multipart(multipart, "resume").await {
        Ok(parsed) => parsed,
        Err(err) => return HttpAppError(err).into_response(),
    };
    let Some((filename, data)) = parsed.file else {
        return HttpAppError(AppError::InvalidInput(
            "No resume file uploaded.".to_string(),
        ))
        .into_response();
    };

    let staged =
        match StagedUpload::stage(state.config.upload_spool_dir.as_deref(), filename, data).await {
            Ok(staged) => staged,
            Err(err) => return HttpAppError(err).into_response(),
        };

    let request = GenerationRequest::ResumeReview {
        document: staged.data.clone(),
        filename: staged.filename.clone(),
    };
    let response = run_generation(&state, identity, request).await;
    staged.discard();
    response
}
