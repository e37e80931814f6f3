//! Router construction and middleware layering.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::identity_middleware;
use crate::handlers;
use crate::state::AppState;

/// Generous enough for the 5 MB document ceiling plus multipart framing;
/// anything larger is cut off before a handler runs.
const UPLOAD_BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: Arc<AppState>) -> Router {
    let ai_routes = Router::new()
        .route("/generate-article", post(handlers::text::generate_article))
        .route(
            "/generate-blog-title",
            post(handlers::text::generate_blog_title),
        )
        .route("/generate-image", post(handlers::image::generate_image))
        .route(
            "/remove-image-background",
            post(handlers::image::remove_image_background),
        )
        .route(
            "/remove-image-object",
            post(handlers::image::remove_image_object),
        )
        .route("/resume-review", post(handlers::document::review_resume))
        .route("/creations", get(handlers::creations::list_creations))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            identity_middleware,
        ))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT_BYTES));

    Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/api/ai", ai_routes)
        .layer(cors_layer(&state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(state: &AppState) -> CorsLayer {
    if state.config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
