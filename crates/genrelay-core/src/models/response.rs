use serde::{Deserialize, Serialize};

/// Uniform response shape returned to the router for every capability.
///
/// `success: false` covers both business-rule rejections and faults; the
/// distinction lives in the HTTP status chosen by the router layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GenerationResponse {
    pub fn generated(content: impl Into<String>) -> Self {
        Self {
            success: true,
            content: Some(content.into()),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            content: None,
            message: Some(message.into()),
        }
    }
}
