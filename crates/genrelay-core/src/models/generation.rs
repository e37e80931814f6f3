use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::validation;

/// One of the supported generation kinds.
///
/// The string form doubles as the ledger `type` column, so every capability
/// maps to a distinct value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    Article,
    BlogTitle,
    #[serde(rename = "image")]
    ImageGeneration,
    BackgroundRemoval,
    ObjectRemoval,
    ResumeReview,
}

impl Capability {
    pub const ALL: [Capability; 6] = [
        Capability::Article,
        Capability::BlogTitle,
        Capability::ImageGeneration,
        Capability::BackgroundRemoval,
        Capability::ObjectRemoval,
        Capability::ResumeReview,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Article => "article",
            Capability::BlogTitle => "blog-title",
            Capability::ImageGeneration => "image",
            Capability::BackgroundRemoval => "background-removal",
            Capability::ObjectRemoval => "object-removal",
            Capability::ResumeReview => "resume-review",
        }
    }
}

impl FromStr for Capability {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "article" => Ok(Capability::Article),
            "blog-title" => Ok(Capability::BlogTitle),
            "image" => Ok(Capability::ImageGeneration),
            "background-removal" => Ok(Capability::BackgroundRemoval),
            "object-removal" => Ok(Capability::ObjectRemoval),
            "resume-review" => Ok(Capability::ResumeReview),
            _ => Err(anyhow::anyhow!("Unknown capability: {}", s)),
        }
    }
}

impl Display for Capability {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// A typed generation request, polymorphic over capability.
///
/// Binary payloads are held as `Bytes` so cloning a request never copies the
/// underlying buffer.
#[derive(Debug, Clone)]
pub enum GenerationRequest {
    Article {
        prompt: String,
        max_tokens: u32,
    },
    BlogTitle {
        prompt: String,
    },
    ImageGeneration {
        prompt: String,
        publish: bool,
    },
    BackgroundRemoval {
        image: Bytes,
        filename: String,
    },
    ObjectRemoval {
        image: Bytes,
        filename: String,
        object: String,
    },
    ResumeReview {
        document: Bytes,
        filename: String,
    },
}

impl GenerationRequest {
    pub fn capability(&self) -> Capability {
        match self {
            GenerationRequest::Article { .. } => Capability::Article,
            GenerationRequest::BlogTitle { .. } => Capability::BlogTitle,
            GenerationRequest::ImageGeneration { .. } => Capability::ImageGeneration,
            GenerationRequest::BackgroundRemoval { .. } => Capability::BackgroundRemoval,
            GenerationRequest::ObjectRemoval { .. } => Capability::ObjectRemoval,
            GenerationRequest::ResumeReview { .. } => Capability::ResumeReview,
        }
    }

    /// The value stored in the ledger `prompt` column.
    pub fn prompt_description(&self) -> String {
        match self {
            GenerationRequest::Article { prompt, .. }
            | GenerationRequest::BlogTitle { prompt }
            | GenerationRequest::ImageGeneration { prompt, .. } => prompt.clone(),
            GenerationRequest::BackgroundRemoval { .. } => {
                "Remove background from image".to_string()
            }
            GenerationRequest::ObjectRemoval { object, .. } => {
                format!("Removed {} from image", object)
            }
            GenerationRequest::ResumeReview { .. } => "Resume Review".to_string(),
        }
    }

    /// Whether the resulting record is published to the community feed.
    pub fn publish(&self) -> bool {
        match self {
            GenerationRequest::ImageGeneration { publish, .. } => *publish,
            _ => false,
        }
    }

    /// Structural validation, performed before any entitlement check or
    /// external call.
    pub fn validate(&self) -> Result<(), AppError> {
        match self {
            GenerationRequest::Article { prompt, max_tokens } => {
                validation::validate_prompt(prompt)?;
                validation::validate_token_budget(*max_tokens)
            }
            GenerationRequest::BlogTitle { prompt } => validation::validate_prompt(prompt),
            GenerationRequest::ImageGeneration { prompt, .. } => {
                validation::validate_prompt(prompt)
            }
            GenerationRequest::BackgroundRemoval { image, .. } => {
                validation::validate_image_present(image)
            }
            GenerationRequest::ObjectRemoval { image, object, .. } => {
                validation::validate_image_present(image)?;
                validation::validate_object_name(object)
            }
            GenerationRequest::ResumeReview { document, .. } => {
                validation::validate_document_present(document)?;
                validation::validate_document_size(document.len())
            }
        }
    }
}

/// Normalized adapter output: inline text or a URI to stored media.
///
/// Transient - the mediation core maps it into a `GenerationRecord`; it is
/// never persisted directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderOutput {
    Text(String),
    Url(String),
}

impl ProviderOutput {
    pub fn content(&self) -> &str {
        match self {
            ProviderOutput::Text(s) | ProviderOutput::Url(s) => s,
        }
    }

    pub fn into_content(self) -> String {
        match self {
            ProviderOutput::Text(s) | ProviderOutput::Url(s) => s,
        }
    }
}

/// A record about to be appended to the generation ledger.
#[derive(Debug, Clone)]
pub struct NewGeneration {
    pub user_id: String,
    pub prompt: String,
    pub content: String,
    pub kind: Capability,
    pub publish: bool,
}

/// One immutable row of the generation ledger.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRecord {
    pub id: Uuid,
    pub user_id: String,
    pub prompt: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: Capability,
    pub publish: bool,
    pub created_at: DateTime<Utc>,
}
