use super::catalog::PlanCatalog;
use super::model::{Plan, SubscriptionState};
use crate::error::{AppError, AppResult};
use crate::infrastructure::repositories::{SubscriptionRepository, UsageRepository};
use chrono::Utc;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// A generation slot claimed before calling the AI gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageReservation {
    pub id: Uuid,
}

/// What a user may do on this request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entitlement {
    /// Plan the user pays for; drives quota
    pub entitled: Plan,
    /// Plan used to build the prompt
    pub effective: Plan,
    pub subscribed: bool,
}

pub struct SubscriptionService {
    subscription_repo: Arc<dyn SubscriptionRepository>,
    usage_repo: Arc<dyn UsageRepository>,
    catalog: Arc<PlanCatalog>,
    free_generation_limit: i64,
    cache: Option<Cache<Uuid, SubscriptionState>>,
}

impl SubscriptionService {
    pub fn new(
        subscription_repo: Arc<dyn SubscriptionRepository>,
        usage_repo: Arc<dyn UsageRepository>,
        catalog: Arc<PlanCatalog>,
        free_generation_limit: i64,
        cache_ttl: Option<Duration>,
    ) -> Self {
        let cache = cache_ttl.map(|ttl| {
            Cache::builder()
                .max_capacity(10_000)
                .time_to_live(ttl)
                .build()
        });

        Self {
            subscription_repo,
            usage_repo,
            catalog,
            free_generation_limit,
            cache,
        }
    }

    pub fn catalog(&self) -> &PlanCatalog {
        &self.catalog
    }

    /// Current plan and subscription flag for a user. Users without a
    /// mirror row are on the free plan.
    pub async fn current(&self, user_id: Uuid) -> AppResult<SubscriptionState> {
        if let Some(cache) = &self.cache {
            if let Some(state) = cache.get(&user_id).await {
                return Ok(state);
            }
        }

        let state = self
            .subscription_repo
            .find_by_user(user_id)
            .await?
            .map(|record| record.state_at(&self.catalog, Utc::now()))
            .unwrap_or_default();

        tracing::debug!(
            user_id = %user_id,
            plan = %state.plan,
            subscribed = state.subscribed,
            "Subscription resolved"
        );

        if let Some(cache) = &self.cache {
            cache.insert(user_id, state).await;
        }

        Ok(state)
    }

    /// Resolve the plan for a generation request
    pub async fn entitlement(&self, user_id: Uuid, requested: Option<Plan>) -> AppResult<Entitlement> {
        let state = self.current(user_id).await?;
        let entitled = state.entitled_plan();
        let effective = effective_plan(requested, entitled);

        if requested.is_some_and(|plan| plan != effective) {
            tracing::warn!(
                user_id = %user_id,
                requested = ?requested,
                entitled = %entitled,
                "Requested plan exceeds subscription, downgrading"
            );
        }

        Ok(Entitlement {
            entitled,
            effective,
            subscribed: state.subscribed,
        })
    }

    /// Claim one generation from the plan's allowance.
    ///
    /// Fails with `PlanLimitReached` when the allowance is used up. The claim
    /// is recorded immediately, so concurrent requests cannot overspend it.
    pub async fn reserve_usage(&self, user_id: Uuid, plan: Plan) -> AppResult<UsageReservation> {
        let limit = plan.generation_limit(self.free_generation_limit);

        match self
            .usage_repo
            .reserve_generation(user_id, plan, limit)
            .await?
        {
            Some(id) => Ok(UsageReservation { id }),
            None => {
                let limit = limit.unwrap_or_default();
                tracing::info!(user_id = %user_id, plan = %plan, limit, "Generation allowance used up");
                Err(AppError::PlanLimitReached(format!(
                    "The {} plan allows {} proposal generation(s). Upgrade to Starter or Premium to continue.",
                    plan, limit
                )))
            }
        }
    }

    /// Give back a claim whose generation failed. Errors are logged only.
    pub async fn release_usage(&self, reservation: UsageReservation) {
        if let Err(e) = self.usage_repo.release_generation(reservation.id).await {
            tracing::error!(
                reservation_id = %reservation.id,
                error = %e,
                "Failed to release generation reservation"
            );
        }
    }
}

/// A caller may ask for a lower plan than they pay for, never a higher one
pub fn effective_plan(requested: Option<Plan>, entitled: Plan) -> Plan {
    match requested {
        Some(plan) if plan <= entitled => plan,
        _ => entitled,
    }
}
