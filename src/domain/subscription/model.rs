use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::catalog::PlanCatalog;

/// Subscription tiers, ordered from least to most capable
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[sqlx(type_name = "text")]
#[sqlx(rename_all = "lowercase")]
pub enum Plan {
    #[serde(rename = "free")]
    Free,
    #[serde(rename = "starter")]
    Starter,
    #[serde(rename = "premium")]
    Premium,
}

impl Plan {
    pub const ALL: [Plan; 3] = [Plan::Free, Plan::Starter, Plan::Premium];

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Starter => "starter",
            Plan::Premium => "premium",
        }
    }

    /// Parse a wire name, `None` when it is not a known plan
    pub fn from_key(key: &str) -> Option<Plan> {
        Plan::ALL.into_iter().find(|plan| plan.as_str() == key)
    }

    /// Lifetime generation allowance, `None` for unlimited
    pub fn generation_limit(&self, free_limit: i64) -> Option<i64> {
        match self {
            Plan::Free => Some(free_limit),
            Plan::Starter | Plan::Premium => None,
        }
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "text")]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    PastDue,
    Canceled,
    Incomplete,
    Unpaid,
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::Incomplete => "incomplete",
            SubscriptionStatus::Unpaid => "unpaid",
        };
        write!(f, "{}", s)
    }
}

/// Row mirrored from the payment provider
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubscriptionRecord {
    pub user_id: Uuid,
    pub stripe_customer_id: Option<String>,
    pub stripe_product_id: Option<String>,
    pub status: SubscriptionStatus,
    pub current_period_end: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl SubscriptionRecord {
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        let paying = matches!(
            self.status,
            SubscriptionStatus::Active | SubscriptionStatus::Trialing
        );
        let in_period = self.current_period_end.map_or(true, |end| end > now);
        paying && in_period
    }

    /// Collapse the mirror row into what the rest of the service cares about
    pub fn state_at(&self, catalog: &PlanCatalog, now: DateTime<Utc>) -> SubscriptionState {
        if !self.is_active_at(now) {
            return SubscriptionState::free();
        }

        let plan = self
            .stripe_product_id
            .as_deref()
            .and_then(|product_id| catalog.plan_for_product(product_id))
            .unwrap_or(Plan::Free);

        SubscriptionState {
            plan,
            subscribed: plan != Plan::Free,
        }
    }
}

/// Plan and subscription flag for a user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscriptionState {
    pub plan: Plan,
    pub subscribed: bool,
}

impl SubscriptionState {
    pub fn free() -> Self {
        Self {
            plan: Plan::Free,
            subscribed: false,
        }
    }

    /// The plan the user is paying for right now
    pub fn entitled_plan(&self) -> Plan {
        if self.subscribed {
            self.plan
        } else {
            Plan::Free
        }
    }
}

impl Default for SubscriptionState {
    fn default() -> Self {
        Self::free()
    }
}
