use crate::domain::subscription::SubscriptionRecord;
use crate::error::AppResult;
use crate::infrastructure::db::{check_connection, DbPool};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Read/write access to the subscription mirror.
///
/// The payment provider is the source of truth; rows here are kept in sync
/// by whatever consumes its webhooks.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<SubscriptionRecord>>;

    async fn upsert(&self, record: &SubscriptionRecord) -> AppResult<()>;

    /// Cheap connectivity check used by the readiness probe
    async fn ping(&self) -> AppResult<()>;
}

pub struct PgSubscriptionRepository {
    pool: Arc<DbPool>,
}

impl PgSubscriptionRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<SubscriptionRecord>> {
        let pool = self.pool.as_ref();
        let record = sqlx::query_as::<_, SubscriptionRecord>(
            r#"
            SELECT user_id, stripe_customer_id, stripe_product_id, status,
                   current_period_end, updated_at
            FROM subscriptions
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    async fn upsert(&self, record: &SubscriptionRecord) -> AppResult<()> {
        let pool = self.pool.as_ref();

        sqlx::query(
            r#"
            INSERT INTO subscriptions (
                user_id, stripe_customer_id, stripe_product_id, status,
                current_period_end, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id)
            DO UPDATE SET
                stripe_customer_id = EXCLUDED.stripe_customer_id,
                stripe_product_id = EXCLUDED.stripe_product_id,
                status = EXCLUDED.status,
                current_period_end = EXCLUDED.current_period_end,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(record.user_id)
        .bind(&record.stripe_customer_id)
        .bind(&record.stripe_product_id)
        .bind(record.status)
        .bind(record.current_period_end)
        .bind(record.updated_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        check_connection(&self.pool).await?;
        Ok(())
    }
}
