//! HTTP handlers, one module per capability family.

pub mod creations;
pub mod document;
pub mod health;
pub mod image;
pub mod text;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use genrelay_core::models::{GenerationRequest, GenerationResponse, RejectionReason};
use genrelay_mediation::Mediated;

use crate::auth::RequestIdentity;
use crate::error::HttpAppError;
use crate::state::AppState;

/// Run one generation through the mediation engine and map the outcome onto
/// the uniform response shape.
///
/// Quota exhaustion answers 200 with `success: false` (a normal business
/// outcome); a premium-only capability answers 403; faults use the error's
/// own status metadata.
pub(crate) async fn run_generation(
    state: &AppState,
    identity: RequestIdentity,
    request: GenerationRequest,
) -> Response {
    let outcome = state
        .engine
        .mediate(&identity.user_id, identity.snapshot, request)
        .await;

    match outcome {
        Ok(Mediated::Generated { content, .. }) => {
            Json(GenerationResponse::generated(content)).into_response()
        }
        Ok(Mediated::Rejected(reason)) => {
            let status = match &reason {
                RejectionReason::FreeQuotaExhausted { .. } => StatusCode::OK,
                RejectionReason::PremiumRequired { .. } => StatusCode::FORBIDDEN,
            };
            (status, Json(GenerationResponse::failure(reason.message()))).into_response()
        }
        Err(err) => HttpAppError(err).into_response(),
    }
}
