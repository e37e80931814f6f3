//! Text generation endpoints: articles and blog titles.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Response;
use genrelay_core::models::GenerationRequest;
use serde::Deserialize;

use super::run_generation;
use crate::auth::RequestIdentity;
use crate::error::ApiJson;
use crate::state::AppState;

const DEFAULT_ARTICLE_LENGTH: u32 = 800;

#[derive(Debug, Deserialize)]
pub struct ArticleBody {
    pub prompt: String,
    #[serde(default = "default_article_length")]
    pub length: u32,
}

fn default_article_length() -> u32 {
    DEFAULT_ARTICLE_LENGTH
}

#[derive(Debug, Deserialize)]
pub struct BlogTitleBody {
    pub prompt: String,
}

pub async fn generate_article(
    State(state): State<Arc<AppState>>,
    identity: RequestIdentity,
    ApiJson(body): ApiJson<ArticleBody>,
) -> Response {
    let request = GenerationRequest::Article {
        prompt: body.prompt,
        max_tokens: body.length,
    };
    run_generation(&state, identity, request).await
}

pub async fn generate_blog_title(
    State(state): State<Arc<AppState>>,
    identity: RequestIdentity,
    ApiJson(body): ApiJson<BlogTitleBody>,
) -> Response {
    let request = GenerationRequest::BlogTitle {
        prompt: body.prompt,
    };
    run_generation(&state, identity, request).await
}
