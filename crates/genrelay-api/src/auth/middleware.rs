use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use genrelay_core::AppError;

use crate::auth::RequestIdentity;
use crate::error::HttpAppError;
use crate::state::AppState;

const IDENTITY_HEADER: &str = "x-user-id";

/// Attach the caller's identity and a fresh entitlement snapshot to the
/// request.
///
/// The gateway in front of this service has already authenticated the caller
/// and forwards the opaque user id; a request without it never reaches a
/// handler.
pub async fn identity_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let user_id = match request
        .headers()
        .get(IDENTITY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        Some(id) => id.to_string(),
        None => {
            return HttpAppError(AppError::Unauthorized(
                "Missing authenticated user id".to_string(),
            ))
            .into_response();
        }
    };

    // Resolved immediately before mediation so admission never runs on a
    // stale counter.
    let snapshot = match state.entitlements.resolve(&user_id).await {
        Ok(snapshot) => snapshot,
        Err(err) => return HttpAppError(err).into_response(),
    };

    request
        .extensions_mut()
        .insert(RequestIdentity { user_id, snapshot });

    next.run(request).await
}
