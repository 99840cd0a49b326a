use super::{SubscriptionRepository, UsageRepository};
use crate::domain::subscription::{Plan, SubscriptionRecord};
use crate::error::AppResult;
use crate::infrastructure::repositories::usage_repository::GenerationRecord;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local subscription mirror for local development and tests
#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    records: RwLock<HashMap<Uuid, SubscriptionRecord>>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<SubscriptionRecord>> {
        Ok(self.records.read().await.get(&user_id).cloned())
    }

    async fn upsert(&self, record: &SubscriptionRecord) -> AppResult<()> {
        self.records
            .write()
            .await
            .insert(record.user_id, record.clone());
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryUsageRepository {
    generations: RwLock<Vec<GenerationRecord>>,
}

impl InMemoryUsageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UsageRepository for InMemoryUsageRepository {
    async fn count_generations(&self, user_id: Uuid) -> AppResult<i64> {
        let generations = self.generations.read().await;
        Ok(generations.iter().filter(|g| g.user_id == user_id).count() as i64)
    }

    async fn reserve_generation(
        &self,
        user_id: Uuid,
        plan: Plan,
        limit: Option<i64>,
    ) -> AppResult<Option<Uuid>> {
        let mut generations = self.generations.write().await;

        if let Some(limit) = limit {
            let used = generations.iter().filter(|g| g.user_id == user_id).count() as i64;
            if used >= limit {
                return Ok(None);
            }
        }

        let id = Uuid::new_v4();
        generations.push(GenerationRecord {
            id,
            user_id,
            plan,
            created_at: Utc::now(),
        });

        Ok(Some(id))
    }

    async fn release_generation(&self, id: Uuid) -> AppResult<()> {
        self.generations.write().await.retain(|g| g.id != id);
        Ok(())
    }
}
