//! Schema bootstrap.
//!
//! The service owns two tables; both are created idempotently at startup.
//! This is deliberately not a migration framework.

use genrelay_core::AppError;
use sqlx::PgPool;

pub async fn init_schema(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS entitlements (
            user_id     TEXT PRIMARY KEY,
            plan        TEXT NOT NULL DEFAULT 'free',
            free_usage  INTEGER NOT NULL DEFAULT 0,
            created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS creations (
            id          UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id     TEXT NOT NULL,
            prompt      TEXT NOT NULL,
            content     TEXT NOT NULL,
            type        TEXT NOT NULL,
            publish     BOOLEAN NOT NULL DEFAULT FALSE,
            created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_creations_user_created
        ON creations (user_id, created_at DESC)
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database schema ready");

    Ok(())
}
