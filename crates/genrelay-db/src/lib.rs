//! Database repositories for the data access layer
//!
//! This crate contains the Postgres-backed repositories for the entitlement
//! resolver and the generation ledger, together with the traits the mediation
//! engine depends on.

pub mod db;
pub mod schema;

pub use db::{
    CreationRepository, EntitlementRepository, EntitlementStore, GenerationLedger,
};
pub use schema::init_schema;
