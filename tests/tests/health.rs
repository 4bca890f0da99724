//! Tests for health check endpoints.

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::setup::TestContext;

#[tokio::test]
async fn health_endpoint_reports_structure_and_status() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert!(body.get("status").is_some(), "Response should have 'status'");
    assert!(
        body.get("eventStoreConnected").is_some(),
        "Response should have 'eventStoreConnected'"
    );
    assert!(
        body.get("aggregateStoreConnected").is_some(),
        "Response should have 'aggregateStoreConnected'"
    );
    assert!(
        body["metrics"].get("runsStarted").is_some(),
        "Metrics snapshot should be embedded"
    );

    let status = body["status"].as_str().unwrap_or("");
    assert!(
        status == "healthy" || status == "degraded" || status == "unhealthy",
        "Unexpected status '{}'",
        status
    );
}

#[tokio::test]
async fn ready_endpoint_returns_ok_when_stores_are_healthy() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/health/ready").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn live_endpoint_always_returns_ok() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/health/live").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}
