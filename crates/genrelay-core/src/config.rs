//! Configuration module
//!
//! Environment-driven configuration for the API service, the database pool,
//! object storage, and the external generation providers.

use std::env;
use std::time::Duration;

use crate::constants::MAX_DOCUMENT_SIZE_BYTES;
use crate::storage_types::StorageBackend;

// Common defaults
const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_DB_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 120;
const DEFAULT_CHAT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
const DEFAULT_CHAT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_IMAGE_API_BASE: &str = "https://clipdrop-api.co";
const DEFAULT_TRANSFORM_API_BASE: &str = "https://api.cloudinary.com/v1_1";
const DEFAULT_TRANSFORM_DELIVERY_BASE: &str = "https://res.cloudinary.com";

/// Application configuration, read once at process start.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,

    // Database configuration
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,

    // Storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,

    // Chat completion provider (OpenAI-compatible endpoint)
    pub chat_api_base: String,
    pub chat_api_key: String,
    pub chat_model: String,

    // Image synthesis / background removal provider
    pub image_api_base: String,
    pub image_api_key: String,

    // Image transformation CDN (object removal)
    pub transform_api_base: String,
    pub transform_delivery_base: String,
    pub transform_cloud_name: String,
    pub transform_upload_preset: String,

    // Mediation behavior
    pub provider_timeout_secs: u64,
    pub max_document_size_bytes: usize,
    pub upload_spool_dir: Option<String>,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        // Load .env if present; real environment variables win.
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let chat_api_key = env::var("CHAT_API_KEY")
            .map_err(|_| anyhow::anyhow!("CHAT_API_KEY must be set"))?;

        let storage_backend = match env_opt("STORAGE_BACKEND") {
            Some(raw) => Some(raw.parse::<StorageBackend>()?),
            None => None,
        };

        let cors_origins = env_or("CORS_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            server_port: env_parse_or("SERVER_PORT", DEFAULT_SERVER_PORT),
            cors_origins,
            environment: env_or("ENVIRONMENT", "development"),
            database_url,
            db_max_connections: env_parse_or("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            db_timeout_seconds: env_parse_or("DB_TIMEOUT_SECONDS", DEFAULT_DB_TIMEOUT_SECS),
            storage_backend,
            s3_bucket: env_opt("S3_BUCKET"),
            s3_region: env_opt("S3_REGION").or_else(|| env_opt("AWS_REGION")),
            s3_endpoint: env_opt("S3_ENDPOINT"),
            local_storage_path: env_opt("LOCAL_STORAGE_PATH"),
            local_storage_base_url: env_opt("LOCAL_STORAGE_BASE_URL"),
            chat_api_base: env_or("CHAT_API_BASE", DEFAULT_CHAT_API_BASE),
            chat_api_key,
            chat_model: env_or("CHAT_MODEL", DEFAULT_CHAT_MODEL),
            image_api_base: env_or("IMAGE_API_BASE", DEFAULT_IMAGE_API_BASE),
            image_api_key: env_or("IMAGE_API_KEY", ""),
            transform_api_base: env_or("TRANSFORM_API_BASE", DEFAULT_TRANSFORM_API_BASE),
            transform_delivery_base: env_or(
                "TRANSFORM_DELIVERY_BASE",
                DEFAULT_TRANSFORM_DELIVERY_BASE,
            ),
            transform_cloud_name: env_or("TRANSFORM_CLOUD_NAME", ""),
            transform_upload_preset: env_or("TRANSFORM_UPLOAD_PRESET", ""),
            provider_timeout_secs: env_parse_or(
                "PROVIDER_TIMEOUT_SECS",
                DEFAULT_PROVIDER_TIMEOUT_SECS,
            ),
            max_document_size_bytes: env_parse_or(
                "MAX_DOCUMENT_SIZE_BYTES",
                MAX_DOCUMENT_SIZE_BYTES,
            ),
            upload_spool_dir: env_opt("UPLOAD_SPOOL_DIR"),
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        matches!(
            self.environment.to_lowercase().as_str(),
            "production" | "prod"
        )
    }

    /// Bounded timeout applied by the mediation core to every adapter call.
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_production() {
        let mut config = test_config();
        assert!(!config.is_production());
        config.environment = "Production".to_string();
        assert!(config.is_production());
    }

    #[test]
    fn test_provider_timeout() {
        let config = test_config();
        assert_eq!(config.provider_timeout(), Duration::from_secs(120));
    }

    fn test_config() -> Config {
        Config {
            server_port: 3000,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            database_url: "postgres://localhost/genrelay".to_string(),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            db_timeout_seconds: DEFAULT_DB_TIMEOUT_SECS,
            storage_backend: None,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            local_storage_path: None,
            local_storage_base_url: None,
            chat_api_base: DEFAULT_CHAT_API_BASE.to_string(),
            chat_api_key: "test-key".to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            image_api_base: DEFAULT_IMAGE_API_BASE.to_string(),
            image_api_key: "test-key".to_string(),
            transform_api_base: DEFAULT_TRANSFORM_API_BASE.to_string(),
            transform_delivery_base: DEFAULT_TRANSFORM_DELIVERY_BASE.to_string(),
            transform_cloud_name: "demo".to_string(),
            transform_upload_preset: "unsigned".to_string(),
            provider_timeout_secs: DEFAULT_PROVIDER_TIMEOUT_SECS,
            max_document_size_bytes: MAX_DOCUMENT_SIZE_BYTES,
            upload_spool_dir: None,
        }
    }
}
