//! Application state shared by all handlers.
//!
//! The stores are held as trait objects so router-level tests can wire
//! in-memory fakes instead of Postgres.

use std::sync::Arc;

use genrelay_core::Config;
use genrelay_db::{EntitlementStore, GenerationLedger};
use genrelay_mediation::MediationEngine;

pub struct AppState {
    pub config: Config,
    pub engine: MediationEngine,
    pub entitlements: Arc<dyn EntitlementStore>,
    pub ledger: Arc<dyn GenerationLedger>,
}
