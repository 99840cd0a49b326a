use serde::{Deserialize, Serialize};

use super::catalog::PlanOffer;
use super::model::{Plan, SubscriptionState};

/// Response for GET /api/subscription
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionStatusResponse {
    pub plan: Plan,
    pub subscribed: bool,
}

impl From<SubscriptionState> for SubscriptionStatusResponse {
    fn from(state: SubscriptionState) -> Self {
        Self {
            plan: state.plan,
            subscribed: state.subscribed,
        }
    }
}

impl From<SubscriptionStatusResponse> for SubscriptionState {
    fn from(response: SubscriptionStatusResponse) -> Self {
        Self {
            plan: response.plan,
            subscribed: response.subscribed,
        }
    }
}

/// One entry of GET /api/plans
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanSummary {
    pub plan: Plan,
    pub name: String,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
}

impl From<&PlanOffer> for PlanSummary {
    fn from(offer: &PlanOffer) -> Self {
        Self {
            plan: offer.plan,
            name: offer.name.clone(),
            price: offer.price.clone(),
            price_id: Some(offer.price_id.clone()),
            product_id: Some(offer.product_id.clone()),
        }
    }
}

/// Response for GET /api/plans
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlansResponse {
    pub plans: Vec<PlanSummary>,
}
