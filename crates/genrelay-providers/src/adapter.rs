//! Adapter system core infrastructure
//!
//! This module provides the abstraction layer over external generation
//! services, keeping provider implementations separate from the mediation
//! core. Every remote API's response shape is normalized here into
//! `ProviderOutput` so the core never branches on provider-specific shapes.

use std::fmt::Debug;

use async_trait::async_trait;
use genrelay_core::models::{Capability, GenerationRequest, ProviderOutput};
use genrelay_storage::StorageError;
use thiserror::Error;

/// Failure taxonomy shared by all adapters.
///
/// Each variant is distinguishable so the mediation core can decide how to
/// surface a failure without inspecting provider-specific error shapes.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The remote call did not complete within the client's own deadline.
    #[error("provider request timed out")]
    Timeout,

    /// The remote service answered with a non-success status.
    #[error("remote call failed with status {status}: {detail}")]
    Remote { status: u16, detail: String },

    /// The remote call could not be made or the connection broke.
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote service answered 2xx but the body was not usable.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    /// Relocating a generated artifact into durable storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The request payload cannot be processed (surfaced as a 400, not a
    /// provider fault).
    #[error("{0}")]
    InvalidInput(String),
}

impl ProviderError {
    #[cfg(any(
        feature = "adapter-chat",
        feature = "adapter-clipdrop",
        feature = "adapter-transform-cdn"
    ))]
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}

/// Result type for adapter invocations
pub type ProviderResult = Result<ProviderOutput, ProviderError>;

/// Trait that all provider adapters must implement
///
/// Adapters hold their own remote clients (built once at process start) and
/// must not consult entitlement state: admission is decided exactly once by
/// the mediation core.
#[async_trait]
pub trait ProviderAdapter: Send + Sync + Debug {
    /// Get the adapter name/identifier (used in logs and error codes)
    fn name(&self) -> &str;

    /// The capabilities this adapter serves
    fn capabilities(&self) -> &'static [Capability];

    /// Execute the generation. Synchronous from the mediation core's point of
    /// view: the returned future resolves when the remote work is done.
    async fn invoke(&self, user_id: &str, request: &GenerationRequest) -> ProviderResult;
}

/// Error for a request variant routed to an adapter that does not serve it.
/// Registry wiring bugs surface here instead of panicking.
pub(crate) fn unsupported_request(adapter: &str, request: &GenerationRequest) -> ProviderError {
    ProviderError::InvalidInput(format!(
        "Adapter {} cannot handle {} requests",
        adapter,
        request.capability()
    ))
}
