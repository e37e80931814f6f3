use async_trait::async_trait;
use chrono::{DateTime, Utc};
use genrelay_core::models::{Capability, GenerationRecord, NewGeneration};
use genrelay_core::AppError;
use sqlx::PgPool;
use uuid::Uuid;

use super::traits::GenerationLedger;

#[derive(Debug, sqlx::FromRow)]
struct CreationRow {
    id: Uuid,
    user_id: String,
    prompt: String,
    content: String,
    #[sqlx(rename = "type")]
    kind: String,
    publish: bool,
    created_at: DateTime<Utc>,
}

impl CreationRow {
    fn into_record(self) -> Result<GenerationRecord, AppError> {
        let kind: Capability = self.kind.parse().map_err(|_| {
            AppError::Internal(format!("Unknown generation type in ledger: {}", self.kind))
        })?;
        Ok(GenerationRecord {
            id: self.id,
            user_id: self.user_id,
            prompt: self.prompt,
            content: self.content,
            kind,
            publish: self.publish,
            created_at: self.created_at,
        })
    }
}

/// Append-only ledger backed by the `creations` table.
#[derive(Clone)]
pub struct CreationRepository {
    pool: PgPool,
}

impl CreationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GenerationLedger for CreationRepository {
    async fn append(&self, record: NewGeneration) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO creations (user_id, prompt, content, type, publish)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&record.user_id)
        .bind(&record.prompt)
        .bind(&record.content)
        .bind(record.kind.as_str())
        .bind(record.publish)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(
            user_id = %record.user_id,
            kind = %record.kind,
            record_id = %id,
            "Appended generation record"
        );

        Ok(id)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<GenerationRecord>, AppError> {
        let rows: Vec<CreationRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, prompt, content, type, publish, created_at
            FROM creations
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CreationRow::into_record).collect()
    }
}
