//! Service-wide constants.

/// Number of successful generations a free-tier user may perform before
/// being asked to upgrade.
pub const FREE_GENERATION_LIMIT: u32 = 10;

/// Hard ceiling on uploaded document size, enforced before any extraction.
pub const MAX_DOCUMENT_SIZE_BYTES: usize = 5 * 1024 * 1024;

/// Minimum extracted text length for a document review to proceed.
pub const MIN_REVIEW_TEXT_CHARS: usize = 100;

/// Token budget for blog title generation.
pub const BLOG_TITLE_MAX_TOKENS: u32 = 100;

/// Token budget for resume reviews.
pub const RESUME_REVIEW_MAX_TOKENS: u32 = 1000;

/// Sampling temperature used for all chat completions.
pub const CHAT_TEMPERATURE: f32 = 0.7;
