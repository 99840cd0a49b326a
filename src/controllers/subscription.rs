use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    domain::subscription::{
        Plan, PlanSummary, PlansResponse, SubscriptionService, SubscriptionStatusResponse,
    },
    error::AppResult,
    infrastructure::auth::AuthUser,
};

pub struct SubscriptionController {
    subscription_service: Arc<SubscriptionService>,
}

impl SubscriptionController {
    pub fn new(subscription_service: Arc<SubscriptionService>) -> Self {
        Self {
            subscription_service,
        }
    }

    /// GET /api/subscription - Current plan of the authenticated user
    pub async fn get_subscription(
        State(controller): State<Arc<SubscriptionController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<SubscriptionStatusResponse>> {
        let state = controller
            .subscription_service
            .current(auth_user.user_id)
            .await?;
        Ok(Json(state.into()))
    }

    /// GET /api/plans - Plans on sale
    pub async fn list_plans(
        State(controller): State<Arc<SubscriptionController>>,
    ) -> Json<PlansResponse> {
        let mut plans = vec![PlanSummary {
            plan: Plan::Free,
            name: "Free".to_string(),
            price: "R$ 0".to_string(),
            price_id: None,
            product_id: None,
        }];
        plans.extend(
            controller
                .subscription_service
                .catalog()
                .offers()
                .iter()
                .map(PlanSummary::from),
        );

        Json(PlansResponse { plans })
    }
}
