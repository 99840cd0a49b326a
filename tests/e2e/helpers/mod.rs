use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use proposal_backend::{
    domain::{auth::JwtIdentityProvider, subscription::PlanCatalog},
    infrastructure::{
        gateway::ChatCompletionsGateway,
        http::{create_router, Dependencies},
        repositories::{InMemorySubscriptionRepository, InMemoryUsageRepository},
    },
};
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;
use uuid::Uuid;

pub mod api_client;
pub mod fixtures;

use api_client::TestClient;
use fixtures::TestFixtures;

pub const JWT_SECRET: &str = "test-jwt-secret-key-for-testing-only";
pub const JWT_AUDIENCE: &str = "authenticated";
pub const GATEWAY_API_KEY: &str = "test-gateway-key";
pub const FREE_PLAN_GENERATION_LIMIT: i64 = 1;

/// Stand-in for the AI gateway: answers with a configurable status and body
/// and remembers what it was asked
pub struct FakeUpstream {
    calls: AtomicUsize,
    response: Mutex<(StatusCode, Value)>,
    last_request: Mutex<Option<Value>>,
    last_authorization: Mutex<Option<String>>,
    latency: Mutex<Duration>,
}

#[allow(dead_code)]
impl FakeUpstream {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            response: Mutex::new((StatusCode::OK, completion("Proposta gerada"))),
            last_request: Mutex::new(None),
            last_authorization: Mutex::new(None),
            latency: Mutex::new(Duration::ZERO),
        }
    }

    pub fn respond_with(&self, status: StatusCode, body: Value) {
        *self.response.lock().unwrap() = (status, body);
    }

    /// Hold every answer for the given time
    pub fn delay_responses(&self, latency: Duration) {
        *self.latency.lock().unwrap() = latency;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<Value> {
        self.last_request.lock().unwrap().clone()
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.last_authorization.lock().unwrap().clone()
    }

    /// Content of the message with the given role in the last request
    pub fn last_message(&self, role: &str) -> Option<String> {
        self.last_request()?
            .get("messages")?
            .as_array()?
            .iter()
            .find(|m| m.get("role").and_then(|r| r.as_str()) == Some(role))?
            .get("content")?
            .as_str()
            .map(|s| s.to_string())
    }
}

/// A well-formed chat completion with a single choice
pub fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

async fn chat_completions(
    State(upstream): State<Arc<FakeUpstream>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    upstream.calls.fetch_add(1, Ordering::SeqCst);
    *upstream.last_request.lock().unwrap() = Some(body);
    *upstream.last_authorization.lock().unwrap() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    let latency = *upstream.latency.lock().unwrap();
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }

    let (status, body) = upstream.response.lock().unwrap().clone();
    (status, Json(body))
}

/// Serve a router on an ephemeral port and return its base URL
pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to get local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

pub struct TestContext {
    pub client: TestClient,
    pub upstream: Arc<FakeUpstream>,
    #[allow(dead_code)]
    pub upstream_url: String,
    pub fixtures: TestFixtures,
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            let upstream = Arc::new(FakeUpstream::new());
            let upstream_url = format!(
                "{}/v1/chat/completions",
                serve(
                    Router::new()
                        .route("/v1/chat/completions", post(chat_completions))
                        .with_state(upstream.clone()),
                )
                .await
            );

            let subscriptions = Arc::new(InMemorySubscriptionRepository::new());
            let app = create_test_app(
                subscriptions.clone(),
                upstream_url.clone(),
                Some(GATEWAY_API_KEY.to_string()),
            );
            let base_url = serve(app).await;

            Self {
                client: TestClient::new(&base_url),
                upstream,
                upstream_url,
                fixtures: TestFixtures::new(subscriptions),
            }
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // Nothing outlives the test: repositories are in memory
        }
    }
}

/// Same wiring as the binary, with in-memory storage and local JWT verification
pub fn create_test_app(
    subscriptions: Arc<InMemorySubscriptionRepository>,
    gateway_url: String,
    gateway_api_key: Option<String>,
) -> Router {
    create_router(Dependencies {
        identity_provider: Arc::new(JwtIdentityProvider::new(JWT_SECRET, JWT_AUDIENCE)),
        subscription_repo: subscriptions,
        usage_repo: Arc::new(InMemoryUsageRepository::new()),
        gateway: Arc::new(ChatCompletionsGateway::new(gateway_url, gateway_api_key)),
        catalog: Arc::new(PlanCatalog::default()),
        free_plan_generation_limit: FREE_PLAN_GENERATION_LIMIT,
        subscription_cache_ttl: None,
    })
}

// Helper to generate valid access tokens for testing
pub fn generate_test_jwt(user_id: &Uuid) -> String {
    generate_test_jwt_with(user_id, JWT_SECRET, JWT_AUDIENCE, 1)
}

// Helper to generate tokens with a specific secret, audience and lifetime
pub fn generate_test_jwt_with(
    user_id: &Uuid,
    secret: &str,
    audience: &str,
    expires_in_hours: i64,
) -> String {
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use proposal_backend::domain::auth::Claims;

    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        email: Some("test@example.com".to_string()),
        aud: audience.to_string(),
        exp: (now + chrono::Duration::hours(expires_in_hours)).timestamp(),
        iat: Some(now.timestamp()),
        role: Some("authenticated".to_string()),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}
