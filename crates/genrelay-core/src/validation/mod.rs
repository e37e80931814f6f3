//! Validation modules

mod request;

pub use request::{
    validate_document_present, validate_document_size, validate_image_present,
    validate_object_name, validate_prompt, validate_token_budget, MAX_PROMPT_CHARS,
    MAX_TOKEN_BUDGET,
};
