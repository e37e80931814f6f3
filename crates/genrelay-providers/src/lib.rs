//! Genrelay Provider Adapters
//!
//! One adapter per external generative capability, each normalizing a
//! heterogeneous remote API into the uniform `ProviderAdapter` contract.
//! Adapters are process-wide clients built once at startup, registered in an
//! `AdapterRegistry`, and injected into the mediation engine.

pub mod adapter;
pub mod registry;

#[cfg(feature = "adapter-clipdrop")]
pub mod background_removal;
#[cfg(feature = "adapter-chat")]
pub mod chat;
#[cfg(feature = "adapter-document-review")]
pub mod extract;
#[cfg(feature = "adapter-clipdrop")]
pub mod image_generation;
#[cfg(feature = "adapter-transform-cdn")]
pub mod object_removal;
#[cfg(feature = "adapter-document-review")]
pub mod resume_review;
#[cfg(feature = "adapter-chat")]
pub mod text_generation;

pub use adapter::{ProviderAdapter, ProviderError, ProviderResult};
pub use registry::AdapterRegistry;

#[cfg(feature = "adapter-clipdrop")]
pub use background_removal::BackgroundRemovalAdapter;
#[cfg(feature = "adapter-chat")]
pub use chat::{ChatCompletion, OpenAiCompatClient};
#[cfg(feature = "adapter-document-review")]
pub use extract::{DocumentExtractor, PdfTextExtractor};
#[cfg(feature = "adapter-clipdrop")]
pub use image_generation::ImageGenerationAdapter;
#[cfg(feature = "adapter-transform-cdn")]
pub use object_removal::ObjectRemovalAdapter;
#[cfg(feature = "adapter-document-review")]
pub use resume_review::ResumeReviewAdapter;
#[cfg(feature = "adapter-chat")]
pub use text_generation::TextGenerationAdapter;
