use anyhow::Result;
use chrono::{Duration, Utc};
use proposal_backend::domain::subscription::{SubscriptionRecord, SubscriptionStatus};
use proposal_backend::infrastructure::repositories::{
    InMemorySubscriptionRepository, SubscriptionRepository,
};
use std::sync::Arc;
use uuid::Uuid;

pub const STARTER_PRODUCT_ID: &str = "prod_TPdY2x0VDdT389";
pub const PREMIUM_PRODUCT_ID: &str = "prod_TPdZry595rL8FP";

pub struct TestFixtures {
    subscriptions: Arc<InMemorySubscriptionRepository>,
}

impl TestFixtures {
    pub fn new(subscriptions: Arc<InMemorySubscriptionRepository>) -> Self {
        Self { subscriptions }
    }

    pub async fn create_subscription(
        &self,
        user_id: Uuid,
        product_id: &str,
        status: SubscriptionStatus,
    ) -> Result<SubscriptionRecord> {
        let record = SubscriptionRecord {
            user_id,
            stripe_customer_id: Some(format!("cus_{}", user_id.simple())),
            stripe_product_id: Some(product_id.to_string()),
            status,
            current_period_end: Some(Utc::now() + Duration::days(30)),
            updated_at: Utc::now(),
        };

        self.subscriptions.upsert(&record).await?;

        Ok(record)
    }

    pub async fn create_starter_subscriber(&self) -> Result<Uuid> {
        let user_id = Uuid::new_v4();
        self.create_subscription(user_id, STARTER_PRODUCT_ID, SubscriptionStatus::Active)
            .await?;
        Ok(user_id)
    }

    pub async fn create_premium_subscriber(&self) -> Result<Uuid> {
        let user_id = Uuid::new_v4();
        self.create_subscription(user_id, PREMIUM_PRODUCT_ID, SubscriptionStatus::Active)
            .await?;
        Ok(user_id)
    }
}
