//! Structural request validation.
//!
//! These checks run before any entitlement lookup or external call. They are
//! pure functions so the mediation engine and the HTTP layer can share them.

use crate::constants::MAX_DOCUMENT_SIZE_BYTES;
use crate::error::AppError;

/// Upper bound on prompt length accepted from callers.
pub const MAX_PROMPT_CHARS: usize = 10_000;

/// Upper bound on the caller-supplied token budget for articles.
pub const MAX_TOKEN_BUDGET: u32 = 4096;

pub fn validate_prompt(prompt: &str) -> Result<(), AppError> {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput("Prompt must not be empty.".to_string()));
    }
    if trimmed.chars().count() > MAX_PROMPT_CHARS {
        return Err(AppError::InvalidInput(format!(
            "Prompt exceeds {} characters.",
            MAX_PROMPT_CHARS
        )));
    }
    Ok(())
}

pub fn validate_token_budget(max_tokens: u32) -> Result<(), AppError> {
    if max_tokens == 0 || max_tokens > MAX_TOKEN_BUDGET {
        return Err(AppError::InvalidInput(format!(
            "Length must be between 1 and {} tokens.",
            MAX_TOKEN_BUDGET
        )));
    }
    Ok(())
}

/// The object to erase must be exactly one token: non-empty, no embedded
/// whitespace.
pub fn validate_object_name(object: &str) -> Result<(), AppError> {
    let trimmed = object.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput("Object name must not be empty.".to_string()));
    }
    if trimmed.split_whitespace().count() != 1 {
        return Err(AppError::InvalidInput(
            "Object name must be a single word.".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_image_present(image: &[u8]) -> Result<(), AppError> {
    if image.is_empty() {
        return Err(AppError::InvalidInput("No image uploaded.".to_string()));
    }
    Ok(())
}

pub fn validate_document_present(document: &[u8]) -> Result<(), AppError> {
    if document.is_empty() {
        return Err(AppError::InvalidInput("No resume file uploaded.".to_string()));
    }
    Ok(())
}

/// Documents over the ceiling are rejected before any extraction work.
pub fn validate_document_size(size: usize) -> Result<(), AppError> {
    if size > MAX_DOCUMENT_SIZE_BYTES {
        return Err(AppError::PayloadTooLarge(
            "Resume file exceeds 5MB limit.".to_string(),
        ));
    }
    Ok(())
}
