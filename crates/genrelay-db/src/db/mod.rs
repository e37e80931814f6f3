//! Repository implementations for database operations
//!
//! Each repository is responsible for a specific domain entity. The traits
//! they implement are defined here so downstream crates can depend on the
//! contract without touching sqlx.

mod creations;
mod entitlements;
mod traits;

pub use creations::CreationRepository;
pub use entitlements::EntitlementRepository;
pub use traits::{EntitlementStore, GenerationLedger};
