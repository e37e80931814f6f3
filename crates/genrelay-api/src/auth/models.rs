use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use genrelay_core::models::EntitlementSnapshot;
use genrelay_core::AppError;

use crate::error::HttpAppError;

/// The authenticated caller plus the entitlement snapshot resolved for this
/// request. Snapshots are never reused across requests.
#[derive(Debug, Clone)]
pub struct RequestIdentity {
    pub user_id: String,
    pub snapshot: EntitlementSnapshot,
}

// Implement FromRequestParts so RequestIdentity composes with Multipart:
// Extension cannot be used as the last extractor alongside it, so we read the
// extension from request parts directly.
impl<S> FromRequestParts<S> for RequestIdentity
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestIdentity>()
            .cloned()
            .ok_or_else(|| {
                HttpAppError(AppError::Unauthorized(
                    "Missing request identity".to_string(),
                ))
            })
    }
}
