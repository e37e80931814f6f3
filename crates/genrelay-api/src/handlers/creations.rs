//! Ledger read endpoint: the caller's own generations, newest first.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use genrelay_core::models::GenerationRecord;
use serde::Serialize;

use crate::auth::RequestIdentity;
use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreationsResponse {
    pub success: bool,
    pub creations: Vec<GenerationRecord>,
}

pub async fn list_creations(
    State(state): State<Arc<AppState>>,
    identity: RequestIdentity,
) -> Result<Json<CreationsResponse>, HttpAppError> {
    let creations = state.ledger.list_for_user(&identity.user_id).await?;
    Ok(Json(CreationsResponse {
        success: true,
        creations,
    }))
}
