use crate::e2e::helpers;

use helpers::TestContext;
use hyper::{Method, StatusCode};
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_ok_for_health_check(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();

    response.assert_status(StatusCode::OK);

    // Health endpoint returns plain text
    let body = String::from_utf8(response.body_bytes.clone()).unwrap();
    assert_eq!(body, "OK");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_ready_status(ctx: &TestContext) {
    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body.get("status").and_then(|v| v.as_str()), Some("ready"));
    assert_eq!(body.get("database").and_then(|v| v.as_str()), Some("connected"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_generate_request_ids(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();
    response.assert_header_exists("x-request-id");

    let response = ctx.client.get("/health/ready").await.unwrap();
    response.assert_header_exists("x-request-id");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_echo_incoming_request_id(ctx: &TestContext) {
    let response = ctx
        .client
        .send(Method::GET, "/health", None, &[("x-request-id", "trace-abc-123")])
        .await
        .unwrap();

    response.assert_header("x-request-id", "trace-abc-123");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_answer_cors_preflight(ctx: &TestContext) {
    let response = ctx
        .client
        .send(
            Method::OPTIONS,
            "/api/proposals/generate",
            None,
            &[
                ("Origin", "https://app.example.com"),
                ("Access-Control-Request-Method", "POST"),
                (
                    "Access-Control-Request-Headers",
                    "authorization,content-type,x-client-info,apikey",
                ),
            ],
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("access-control-allow-origin", "*")
        .assert_header_exists("x-request-id");

    let allowed = response
        .header("access-control-allow-headers")
        .unwrap()
        .to_lowercase();
    for header in ["authorization", "content-type", "x-client-info", "apikey"] {
        assert!(allowed.contains(header), "{} should be allowed", header);
    }
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_add_cors_headers_to_errors(ctx: &TestContext) {
    let response = ctx
        .client
        .send(
            Method::POST,
            "/api/proposals/generate",
            Some(b"{}".to_vec()),
            &[
                ("Origin", "https://app.example.com"),
                ("Content-Type", "application/json"),
            ],
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_header("access-control-allow-origin", "*");
}
