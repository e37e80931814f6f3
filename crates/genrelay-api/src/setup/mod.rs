//! Application assembly: database, storage, providers, router.

pub mod routes;
pub mod server;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use genrelay_core::Config;
use genrelay_db::{
    CreationRepository, EntitlementRepository, EntitlementStore, GenerationLedger,
};
use genrelay_mediation::MediationEngine;
use genrelay_providers::{
    AdapterRegistry, BackgroundRemovalAdapter, ChatCompletion, ImageGenerationAdapter,
    ObjectRemovalAdapter, OpenAiCompatClient, PdfTextExtractor, ResumeReviewAdapter,
    TextGenerationAdapter,
};
use genrelay_storage::Storage;
use sqlx::postgres::PgPoolOptions;

use crate::state::AppState;

/// Connect the collaborators and build the router.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router)> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds))
        .connect(&config.database_url)
        .await?;

    genrelay_db::init_schema(&pool).await?;

    let storage = genrelay_storage::create_storage(&config).await?;
    let registry = build_adapters(&config, storage).await?;

    let entitlements: Arc<dyn EntitlementStore> =
        Arc::new(EntitlementRepository::new(pool.clone()));
    let ledger: Arc<dyn GenerationLedger> = Arc::new(CreationRepository::new(pool.clone()));

    let engine = MediationEngine::new(
        registry,
        entitlements.clone(),
        ledger.clone(),
        config.provider_timeout(),
    );

    let state = Arc::new(AppState {
        config,
        engine,
        entitlements,
        ledger,
    });

    let router = routes::build_router(state.clone());

    Ok((state, router))
}

/// Build the process-wide provider clients and register each adapter for the
/// capabilities it serves.
async fn build_adapters(config: &Config, storage: Arc<dyn Storage>) -> Result<AdapterRegistry> {
    let chat: Arc<dyn ChatCompletion> = Arc::new(OpenAiCompatClient::new(
        config.chat_api_base.clone(),
        config.chat_api_key.clone(),
        config.chat_model.clone(),
    )?);

    let registry = AdapterRegistry::new();

    registry
        .register(Arc::new(TextGenerationAdapter::new(chat.clone())))
        .await?;
    registry
        .register(Arc::new(ImageGenerationAdapter::new(
            config.image_api_base.clone(),
            config.image_api_key.clone(),
            storage.clone(),
        )?))
        .await?;
    registry
        .register(Arc::new(BackgroundRemovalAdapter::new(
            config.image_api_base.clone(),
            config.image_api_key.clone(),
            storage.clone(),
        )?))
        .await?;
    registry
        .register(Arc::new(ObjectRemovalAdapter::new(
            config.transform_api_base.clone(),
            config.transform_delivery_base.clone(),
            config.transform_cloud_name.clone(),
            config.transform_upload_preset.clone(),
        )?))
        .await?;
    registry
        .register(Arc::new(ResumeReviewAdapter::new(
            Arc::new(PdfTextExtractor),
            chat,
        )))
        .await?;

    Ok(registry)
}
