use anyhow::Context;
use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    controllers::{health, proposal::ProposalController, subscription::SubscriptionController},
    domain::{
        auth::IdentityProvider,
        proposal::ProposalService,
        subscription::{PlanCatalog, SubscriptionService},
    },
    infrastructure::{
        auth::{auth_middleware, request_id_middleware},
        config::Config,
        gateway::CompletionGateway,
        repositories::{SubscriptionRepository, UsageRepository},
    },
};

/// Everything the router needs, already constructed
pub struct Dependencies {
    pub identity_provider: Arc<dyn IdentityProvider>,
    pub subscription_repo: Arc<dyn SubscriptionRepository>,
    pub usage_repo: Arc<dyn UsageRepository>,
    pub gateway: Arc<dyn CompletionGateway>,
    pub catalog: Arc<PlanCatalog>,
    pub free_plan_generation_limit: i64,
    pub subscription_cache_ttl: Option<Duration>,
}

/// Build the application router: services, controllers and routes
pub fn create_router(deps: Dependencies) -> Router {
    // Services
    let subscription_service = Arc::new(SubscriptionService::new(
        deps.subscription_repo.clone(),
        deps.usage_repo,
        deps.catalog,
        deps.free_plan_generation_limit,
        deps.subscription_cache_ttl,
    ));
    let proposal_service = Arc::new(ProposalService::new(
        subscription_service.clone(),
        deps.gateway,
    ));

    // Controllers
    let proposal_controller = Arc::new(ProposalController::new(proposal_service));
    let subscription_controller = Arc::new(SubscriptionController::new(subscription_service));

    // Proposal routes (need auth)
    let proposal_routes = Router::new()
        .route("/api/proposals/generate", post(ProposalController::generate))
        .with_state(proposal_controller)
        .layer(middleware::from_fn_with_state(
            deps.identity_provider.clone(),
            auth_middleware,
        ));

    // Subscription status (needs auth)
    let subscription_routes = Router::new()
        .route("/api/subscription", get(SubscriptionController::get_subscription))
        .with_state(subscription_controller.clone())
        .layer(middleware::from_fn_with_state(
            deps.identity_provider.clone(),
            auth_middleware,
        ));

    // Plan catalog (public)
    let plan_routes = Router::new()
        .route("/api/plans", get(SubscriptionController::list_plans))
        .with_state(subscription_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(deps.subscription_repo)
        .merge(proposal_routes)
        .merge(subscription_routes)
        .merge(plan_routes)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer()),
        )
}

/// Browsers call the API directly from the front-end
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
