//! Genrelay Mediation Core
//!
//! The per-request orchestration layer: validate the typed request, decide
//! admission from the caller's entitlement snapshot, invoke the matching
//! provider adapter exactly once under a bounded timeout, append the result
//! to the ledger, and charge free-tier quota - in that order, stopping at the
//! first failure so quota and storage state never diverge.

pub mod admission;
pub mod engine;

pub use admission::{access_for, admit, CapabilityAccess};
pub use engine::{Mediated, MediationEngine};
