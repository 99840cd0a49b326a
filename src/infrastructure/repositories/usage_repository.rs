use crate::domain::subscription::Plan;
use crate::error::AppResult;
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::sync::Arc;
use uuid::Uuid;

/// One successful proposal generation. The proposal text is not stored.
#[derive(Debug, Clone, FromRow)]
pub struct GenerationRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan: Plan,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait UsageRepository: Send + Sync {
    /// Number of generations recorded for a user, all time
    async fn count_generations(&self, user_id: Uuid) -> AppResult<i64>;

    /// Record a generation unless the user already has `limit` of them.
    ///
    /// The count and the insert are atomic per user. Returns the id of the
    /// new record, or `None` when the limit is reached.
    async fn reserve_generation(
        &self,
        user_id: Uuid,
        plan: Plan,
        limit: Option<i64>,
    ) -> AppResult<Option<Uuid>>;

    /// Drop a reservation whose generation did not complete
    async fn release_generation(&self, id: Uuid) -> AppResult<()>;
}

pub struct PgUsageRepository {
    pool: Arc<DbPool>,
}

impl PgUsageRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsageRepository for PgUsageRepository {
    async fn count_generations(&self, user_id: Uuid) -> AppResult<i64> {
        let pool = self.pool.as_ref();
        let (count,) = sqlx::query_as::<_, (i64,)>(
            "SELECT COUNT(*) FROM proposal_generations WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    async fn reserve_generation(
        &self,
        user_id: Uuid,
        plan: Plan,
        limit: Option<i64>,
    ) -> AppResult<Option<Uuid>> {
        let mut tx = self.pool.begin().await?;

        if let Some(limit) = limit {
            // Serialises reservations of the same user until commit
            sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
                .bind(user_id.to_string())
                .execute(&mut *tx)
                .await?;

            let (used,) = sqlx::query_as::<_, (i64,)>(
                "SELECT COUNT(*) FROM proposal_generations WHERE user_id = $1",
            )
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

            if used >= limit {
                tx.rollback().await?;
                return Ok(None);
            }
        }

        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO proposal_generations (id, user_id, plan, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(plan)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(id))
    }

    async fn release_generation(&self, id: Uuid) -> AppResult<()> {
        let pool = self.pool.as_ref();

        sqlx::query("DELETE FROM proposal_generations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }
}
