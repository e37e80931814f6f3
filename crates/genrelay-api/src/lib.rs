//! Genrelay API
//!
//! The HTTP surface of the mediation service: an axum router decoding typed
//! requests and the caller's authenticated identity, handing both to the
//! mediation engine, and mapping outcomes onto the uniform response shape.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;
pub mod utils;

pub use state::AppState;
