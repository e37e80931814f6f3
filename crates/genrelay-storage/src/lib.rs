//! Genrelay Storage Library
//!
//! This crate provides the object-storage abstraction used to hold generated
//! and uploaded media. It includes the Storage trait and implementations for
//! S3-compatible services and the local filesystem.
//!
//! # Storage key format
//!
//! Storage keys are user-scoped. All backends use the same key layout for
//! consistency:
//!
//! - `generations/{user_id}/{filename}`
//!
//! Keys must not contain `..` or a leading `/`. Key generation is centralized
//! in the `keys` module so all backends stay consistent.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use genrelay_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
