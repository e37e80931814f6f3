//! Per-request mediation engine
//!
//! Drives the request state machine:
//! Received -> Validated -> Admitted|Rejected -> Invoked -> Persisted ->
//! Counted -> Completed, with Failed(reason) reachable from Validated,
//! Invoked, or Persisted. Ordering invariant: (adapter success) ->
//! (ledger append success) -> (entitlement increment); if any step fails, no
//! later step executes.

use std::sync::Arc;
use std::time::Duration;

use genrelay_core::models::{
    AdmissionDecision, EntitlementSnapshot, GenerationRequest, NewGeneration, RejectionReason,
    Tier,
};
use genrelay_core::AppError;
use genrelay_db::{EntitlementStore, GenerationLedger};
use genrelay_providers::{AdapterRegistry, ProviderError};
use uuid::Uuid;

use crate::admission;

/// Terminal outcome of a mediated request that did not fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mediated {
    /// The generation succeeded and was recorded.
    Generated { record_id: Uuid, content: String },
    /// The request was not admitted. A normal outcome, not an error.
    Rejected(RejectionReason),
}

/// Orchestrates one generation request end to end.
///
/// All collaborators are process-wide dependencies injected at startup, so
/// tests substitute fakes for the stores and adapters. The engine spawns no
/// detached tasks and holds no locks across adapter calls: dropping the
/// `mediate` future (caller disconnect) before the adapter resolves abandons
/// the call and can never persist a record or charge quota.
pub struct MediationEngine {
    registry: AdapterRegistry,
    entitlements: Arc<dyn EntitlementStore>,
    ledger: Arc<dyn GenerationLedger>,
    provider_timeout: Duration,
}

impl MediationEngine {
    pub fn new(
        registry: AdapterRegistry,
        entitlements: Arc<dyn EntitlementStore>,
        ledger: Arc<dyn GenerationLedger>,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            entitlements,
            ledger,
            provider_timeout,
        }
    }

    pub async fn mediate(
        &self,
        user_id: &str,
        snapshot: EntitlementSnapshot,
        request: GenerationRequest,
    ) -> Result<Mediated, AppError> {
        let capability = request.capability();

        // Received -> Validated
        request.validate()?;

        // Validated -> Admitted | Rejected
        if let AdmissionDecision::Rejected(reason) = admission::admit(&snapshot, capability) {
            tracing::debug!(
                user_id = %user_id,
                capability = %capability,
                "Request rejected by admission policy"
            );
            return Ok(Mediated::Rejected(reason));
        }

        // Admitted -> Invoked: exactly one adapter call, bounded timeout,
        // no retry here.
        let adapter = self.registry.get(capability).await?;
        let start = std::time::Instant::now();

        let invocation =
            tokio::time::timeout(self.provider_timeout, adapter.invoke(user_id, &request)).await;

        let output = match invocation {
            Err(_elapsed) => {
                tracing::warn!(
                    user_id = %user_id,
                    capability = %capability,
                    provider = adapter.name(),
                    timeout_secs = self.provider_timeout.as_secs(),
                    "Provider call timed out"
                );
                return Err(AppError::ProviderTimeout {
                    provider: adapter.name().to_string(),
                    timeout_secs: self.provider_timeout.as_secs(),
                });
            }
            Ok(Err(err)) => {
                return Err(self.map_provider_error(user_id, adapter.name(), err));
            }
            Ok(Ok(output)) => output,
        };

        tracing::info!(
            user_id = %user_id,
            capability = %capability,
            provider = adapter.name(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Provider call completed"
        );

        // Invoked -> Persisted
        let content = output.into_content();
        let record = NewGeneration {
            user_id: user_id.to_string(),
            prompt: request.prompt_description(),
            content: content.clone(),
            kind: capability,
            publish: request.publish(),
        };

        let record_id = match self.ledger.append(record).await {
            Ok(id) => id,
            Err(err) => {
                // The artifact may already exist in external storage; it is
                // now unreferenced. Surface the failure without charging
                // quota and leave the reference for operator reconciliation.
                tracing::warn!(
                    user_id = %user_id,
                    capability = %capability,
                    content_ref = %content,
                    error = %err,
                    "Ledger append failed after successful generation"
                );
                return Err(err);
            }
        };

        // Persisted -> Counted: quota is charged last, and only for the free
        // tier.
        if snapshot.plan == Tier::Free {
            self.entitlements.increment_free_usage(user_id).await?;
        }

        // Counted -> Completed
        Ok(Mediated::Generated { record_id, content })
    }

    fn map_provider_error(&self, user_id: &str, provider: &str, err: ProviderError) -> AppError {
        match err {
            // Payload problems discovered inside the adapter (e.g. an
            // unreadable or near-empty document) are validation outcomes.
            ProviderError::InvalidInput(message) => AppError::InvalidInput(message),
            ProviderError::Timeout => AppError::ProviderTimeout {
                provider: provider.to_string(),
                timeout_secs: self.provider_timeout.as_secs(),
            },
            other => {
                tracing::error!(
                    user_id = %user_id,
                    provider = %provider,
                    error = %other,
                    "Provider call failed"
                );
                AppError::Provider {
                    provider: provider.to_string(),
                    message: other.to_string(),
                }
            }
        }
    }
}
