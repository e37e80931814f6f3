//! Contracts consumed by the mediation engine.
//!
//! The engine holds these as trait objects so tests can substitute in-memory
//! fakes and the HTTP layer never needs to know which backing store is wired.

use async_trait::async_trait;
use genrelay_core::models::{EntitlementSnapshot, GenerationRecord, NewGeneration};
use genrelay_core::AppError;
use uuid::Uuid;

/// Read and atomically update a user's entitlement state.
#[async_trait]
pub trait EntitlementStore: Send + Sync {
    /// Return the user's current plan and free-usage counter. Unknown users
    /// materialize as free-tier with zero usage.
    async fn resolve(&self, user_id: &str) -> Result<EntitlementSnapshot, AppError>;

    /// Atomically add one to the free-usage counter and return the new value.
    /// Called at most once per admitted request, only after the provider call
    /// and the ledger append both succeeded.
    async fn increment_free_usage(&self, user_id: &str) -> Result<u32, AppError>;
}

/// Append-only ledger of generations. No update or delete in the hot path.
#[async_trait]
pub trait GenerationLedger: Send + Sync {
    /// Durably append one record, returning its id.
    async fn append(&self, record: NewGeneration) -> Result<Uuid, AppError>;

    /// The user's records, newest first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<GenerationRecord>, AppError>;
}
