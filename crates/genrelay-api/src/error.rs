//! HTTP error response conversion
//!
//! Every failure below the router boundary is converted into the uniform
//! `{success: false, message}` body; no raw internal error crosses it. The
//! status code and log level come from the error's own metadata.
//!
//! **Preferred handler pattern:** Return `Result<impl IntoResponse, HttpAppError>`.
//! Use `AppError` (or types that implement `Into<AppError>`) for errors so they
//! become `HttpAppError` and render consistently (status, body, logging).

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use genrelay_core::models::GenerationResponse;
use genrelay_core::{AppError, ErrorMetadata, LogLevel};
use genrelay_storage::StorageError;
use serde::de::DeserializeOwned;

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from genrelay-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(err.into())
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let err = self.0;

        match err.log_level() {
            LogLevel::Debug => tracing::debug!(
                code = err.error_code(),
                error = %err.detailed_message(),
                "Request failed"
            ),
            LogLevel::Warn => tracing::warn!(
                code = err.error_code(),
                error = %err.detailed_message(),
                "Request failed"
            ),
            LogLevel::Error => tracing::error!(
                code = err.error_code(),
                error = %err.detailed_message(),
                "Request failed"
            ),
        }

        let status = StatusCode::from_u16(err.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(GenerationResponse::failure(err.client_message()))).into_response()
    }
}

/// Json extractor whose rejection renders in the uniform response shape
/// instead of axum's plain-text default.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                HttpAppError(AppError::InvalidInput(rejection.body_text()))
            })?;
        Ok(ApiJson(value))
    }
}
