use crate::e2e::helpers;

use helpers::{fixtures::PREMIUM_PRODUCT_ID, generate_test_jwt, TestContext};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use proposal_backend::domain::subscription::{
    Plan, PlanSummary, PlansResponse, SubscriptionStatus, SubscriptionStatusResponse,
};
use test_context::test_context;
use uuid::Uuid;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_auth_for_subscription_status(ctx: &TestContext) {
    let response = ctx.client.get("/api/subscription").await.unwrap();

    response
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_error("Unauthorized");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_free_for_users_without_subscription(ctx: &TestContext) {
    let token = generate_test_jwt(&Uuid::new_v4());

    let response = ctx
        .client
        .get_with_auth("/api/subscription", &token)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let status: SubscriptionStatusResponse = response.json().unwrap();
    assert_eq!(
        status,
        SubscriptionStatusResponse {
            plan: Plan::Free,
            subscribed: false,
        }
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_active_paid_plans(ctx: &TestContext) {
    let user_id = ctx.fixtures.create_premium_subscriber().await.unwrap();
    let token = generate_test_jwt(&user_id);

    let response = ctx
        .client
        .get_with_auth("/api/subscription", &token)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.body,
        Some(serde_json::json!({ "plan": "premium", "subscribed": true }))
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_treat_canceled_subscriptions_as_free(ctx: &TestContext) {
    let user_id = Uuid::new_v4();
    ctx.fixtures
        .create_subscription(user_id, PREMIUM_PRODUCT_ID, SubscriptionStatus::Canceled)
        .await
        .unwrap();
    let token = generate_test_jwt(&user_id);

    let response = ctx
        .client
        .get_with_auth("/api/subscription", &token)
        .await
        .unwrap();

    let status: SubscriptionStatusResponse = response.json().unwrap();
    assert_eq!(status.plan, Plan::Free);
    assert!(!status.subscribed);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_plans_without_auth(ctx: &TestContext) {
    let response = ctx.client.get("/api/plans").await.unwrap();

    response.assert_status(StatusCode::OK);
    let plans: PlansResponse = response.json().unwrap();
    let keys: Vec<Plan> = plans.plans.iter().map(|p| p.plan).collect();
    assert_eq!(keys, vec![Plan::Free, Plan::Starter, Plan::Premium]);

    let free: &PlanSummary = &plans.plans[0];
    assert_eq!(free.price_id, None);

    let premium = &plans.plans[2];
    assert_eq!(premium.product_id.as_deref(), Some(PREMIUM_PRODUCT_ID));
    assert!(premium.price_id.is_some());
}
