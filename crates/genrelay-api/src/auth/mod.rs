//! Request identity and entitlement context
//!
//! Authentication itself happens upstream; this layer trusts the gateway's
//! `x-user-id` header, resolves a fresh entitlement snapshot for the request,
//! and makes both available to handlers.

mod middleware;
mod models;

pub use middleware::identity_middleware;
pub use models::RequestIdentity;
