use proposal_backend::domain::subscription::PlanCatalog;
use proposal_backend::infrastructure::config::{Config, LogFormat};
use proposal_backend::infrastructure::db::{check_connection, create_pool, run_migrations};
use proposal_backend::infrastructure::gateway::ChatCompletionsGateway;
use proposal_backend::infrastructure::http::{create_router, start_http_server, Dependencies};
use proposal_backend::infrastructure::identity::build_identity_provider;
use proposal_backend::infrastructure::repositories::{PgSubscriptionRepository, PgUsageRepository};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        environment = ?config.environment,
        "Starting Proposal Backend on {}:{}",
        config.host,
        config.port
    );

    // Create database connection pool
    let pool = create_pool(&config.database_url)
        .await
        .context("Failed to create database pool")?;
    tracing::info!("Database connection pool created");

    // Verify database connection
    check_connection(&pool)
        .await
        .context("Database is not reachable")?;
    tracing::info!("Database connection verified");

    run_migrations(&pool)
        .await
        .context("Failed to apply migrations")?;
    tracing::info!("Database migrations applied");

    if config.ai_gateway_api_key.is_none() {
        tracing::warn!("AI_GATEWAY_API_KEY is not set; proposal generation will fail until it is configured");
    }

    let pool = Arc::new(pool);
    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Identity provider
    tracing::info!(auth_mode = ?config.auth_mode, "Instantiating identity provider...");
    let identity_provider = build_identity_provider(&config).map_err(anyhow::Error::msg)?;

    // 2. Repositories (inject db pool)
    tracing::info!("Instantiating repositories...");
    let subscription_repo = Arc::new(PgSubscriptionRepository::new(pool.clone()));
    let usage_repo = Arc::new(PgUsageRepository::new(pool.clone()));

    // 3. AI gateway
    tracing::info!(url = %config.ai_gateway_url, "Instantiating AI gateway client...");
    let gateway = Arc::new(ChatCompletionsGateway::new(
        config.ai_gateway_url.clone(),
        config.ai_gateway_api_key.clone(),
    ));

    let subscription_cache_ttl = config
        .subscription_cache_enabled
        .then(|| Duration::from_secs(config.subscription_cache_ttl_secs));

    // 4. Services and controllers are wired by the router
    let app = create_router(Dependencies {
        identity_provider,
        subscription_repo,
        usage_repo,
        gateway,
        catalog: Arc::new(PlanCatalog::default()),
        free_plan_generation_limit: config.free_plan_generation_limit,
        subscription_cache_ttl,
    });

    // Start HTTP server with all routes
    start_http_server(config, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "proposal_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "proposal_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
