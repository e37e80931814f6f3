use async_trait::async_trait;
use genrelay_core::models::{EntitlementSnapshot, Tier};
use genrelay_core::AppError;
use sqlx::PgPool;

use super::traits::EntitlementStore;

#[derive(Debug, sqlx::FromRow)]
struct EntitlementRow {
    plan: String,
    free_usage: i32,
}

impl EntitlementRow {
    fn into_snapshot(self) -> Result<EntitlementSnapshot, AppError> {
        let plan: Tier = self
            .plan
            .parse()
            .map_err(|_| AppError::Internal(format!("Unknown plan in database: {}", self.plan)))?;
        Ok(EntitlementSnapshot {
            plan,
            free_usage: self.free_usage.max(0) as u32,
        })
    }
}

/// Entitlement resolver backed by the `entitlements` table.
///
/// The increment is a single UPDATE statement so concurrent requests from the
/// same user serialize inside Postgres; there is no application-side
/// read-modify-write.
#[derive(Clone)]
pub struct EntitlementRepository {
    pool: PgPool,
}

impl EntitlementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntitlementStore for EntitlementRepository {
    async fn resolve(&self, user_id: &str) -> Result<EntitlementSnapshot, AppError> {
        // Upsert so first-time users materialize as free/0. The DO UPDATE is a
        // no-op touch that makes RETURNING yield a row on the conflict path too.
        let row: EntitlementRow = sqlx::query_as(
            r#"
            INSERT INTO entitlements (user_id, plan, free_usage)
            VALUES ($1, 'free', 0)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING plan, free_usage
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        row.into_snapshot()
    }

    async fn increment_free_usage(&self, user_id: &str) -> Result<u32, AppError> {
        let new_count: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE entitlements
            SET free_usage = free_usage + 1, updated_at = now()
            WHERE user_id = $1
            RETURNING free_usage
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let new_count = new_count
            .ok_or_else(|| AppError::NotFound(format!("No entitlement row for {}", user_id)))?;

        tracing::debug!(
            user_id = %user_id,
            free_usage = new_count,
            "Incremented free usage"
        );

        Ok(new_count.max(0) as u32)
    }
}
