//! End-to-end tests for the aggregation trigger.
//!
//! Seed scan events into the in-memory store, POST /aggregate through
//! the real router, then verify the facet collections and the summary
//! the dashboard would read.

use std::sync::Arc;

use api::{router, AppState};
use axum_test::TestServer;
use integration_tests::fixtures::{self, ScanEventBuilder};
use integration_tests::mocks::RegionalFailStore;
use integration_tests::setup::TestContext;
use scan_store::MemoryStore;
use serde_json::json;

#[tokio::test]
async fn aggregate_writes_all_facets_for_one_day() {
    let date = fixtures::test_date();
    let ctx = TestContext::with_events(vec![
        ScanEventBuilder::new("winery-1", "wine-a")
            .hour(9)
            .ip("198.51.100.1")
            .build(),
        ScanEventBuilder::new("winery-1", "wine-a")
            .hour(9)
            .ip("198.51.100.2")
            .build(),
        ScanEventBuilder::new("winery-1", "wine-b")
            .hour(19)
            .device("DESKTOP")
            .language("de-DE")
            .geo("DE", "Bavaria", "Munich")
            .ip("198.51.100.3")
            .build(),
    ]);
    let server = ctx.server();

    let response = server
        .post("/aggregate")
        .json(&json!({ "date": date.to_string() }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["eventsSeen"], 3);
    assert_eq!(body["eventsRejected"], 0);
    assert_eq!(body["wineriesProcessed"], 1);
    assert_eq!(body["truncated"], false);

    // Winery-level daily record.
    let daily = ctx.store.dump("daily_stats").expect("daily collection");
    let winery_key = format!("{}:winery-1:-", date);
    let winery_doc = &daily
        .iter()
        .find(|(key, _)| key == &winery_key)
        .expect("winery-level daily record")
        .1;
    assert_eq!(winery_doc["scanCount"], 3);
    assert_eq!(winery_doc["mobileCount"], 2);
    assert_eq!(winery_doc["desktopCount"], 1);
    assert_eq!(winery_doc["uniqueVisitors"], 3);

    // Both wines got their own daily records too.
    assert!(daily.iter().any(|(key, _)| key.ends_with(":wine-a")));
    assert!(daily.iter().any(|(key, _)| key.ends_with(":wine-b")));

    // Ranking lists wine-a first.
    let rankings = ctx.store.dump("wine_rankings").expect("ranking collection");
    assert_eq!(rankings.len(), 1);
    let entries = rankings[0].1["entries"].as_array().expect("entries array");
    assert_eq!(entries[0]["wineId"], "wine-a");
    assert_eq!(entries[0]["scanCount"], 2);
    assert_eq!(entries[0]["rank"], 1);
    assert_eq!(entries[1]["wineId"], "wine-b");
}

#[tokio::test]
async fn rerunning_a_day_is_idempotent() {
    let date = fixtures::test_date();
    let ctx = TestContext::with_events(fixtures::scans("winery-1", "wine-a", 4));
    let server = ctx.server();

    let body = json!({ "date": date.to_string() });
    server.post("/aggregate").json(&body).await.assert_status_ok();
    let first = ctx.store.dump("daily_stats").expect("daily collection");

    server.post("/aggregate").json(&body).await.assert_status_ok();
    let second = ctx.store.dump("daily_stats").expect("daily collection");

    assert_eq!(first, second);
    // Still exactly one winery-level and one wine-level record.
    assert_eq!(second.len(), 2);
}

#[tokio::test]
async fn aggregate_can_target_a_single_winery() {
    let date = fixtures::test_date();
    let mut events = fixtures::scans("winery-1", "wine-a", 2);
    events.extend(fixtures::scans("winery-2", "wine-x", 3));
    let ctx = TestContext::with_events(events);
    let server = ctx.server();

    let response = server
        .post("/aggregate")
        .json(&json!({ "date": date.to_string(), "wineryId": "winery-2" }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["eventsSeen"], 3);
    assert_eq!(body["wineriesProcessed"], 1);

    let daily = ctx.store.dump("daily_stats").expect("daily collection");
    assert!(daily.iter().all(|(key, _)| key.contains(":winery-2:")));
}

#[tokio::test]
async fn aggregate_reports_empty_days() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/aggregate")
        .json(&json!({ "date": fixtures::test_date().to_string() }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["eventsSeen"], 0);
    assert_eq!(body["wineriesProcessed"], 0);
    let message = body["message"].as_str().expect("message string");
    assert!(message.contains("No scan events"));
}

#[tokio::test]
async fn aggregate_rejects_empty_winery_id() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/aggregate")
        .json(&json!({ "wineryId": "" }))
        .await;
    response.assert_status_bad_request();

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn aggregate_rejects_malformed_bodies() {
    let ctx = TestContext::new();
    let server = ctx.server();

    // A present-but-garbage date must not fall back to the default day.
    let response = server
        .post("/aggregate")
        .content_type("application/json")
        .bytes(r#"{"date":"not-a-date"}"#.into())
        .await;
    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_REQUEST");

    // Same for a body that is not JSON at all.
    let response = server
        .post("/aggregate")
        .content_type("application/json")
        .bytes(r#"{"date":"#.into())
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn facet_write_failures_are_itemized_not_fatal() {
    let date = fixtures::test_date();
    let store = MemoryStore::default();
    store.insert_events(fixtures::scans("winery-1", "wine-a", 2));

    let state = AppState::new(
        Arc::new(store.clone()),
        Arc::new(RegionalFailStore::new(store.clone())),
    );
    let server = TestServer::new(router(state)).expect("Failed to create test server");

    let response = server
        .post("/aggregate")
        .json(&json!({ "date": date.to_string() }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    // The invocation completed; the broken facet is itemized instead.
    assert_eq!(body["success"], true);
    let failures = body["failures"].as_array().expect("failures array");
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0]["wineryId"], "winery-1");

    // The other facets still landed.
    assert_eq!(store.dump("daily_stats").expect("daily collection").len(), 2);
    assert!(store
        .dump("regional_stats")
        .expect("regional collection")
        .is_empty());
}

#[tokio::test]
async fn aggregate_without_body_defaults_to_yesterday() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.post("/aggregate").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let yesterday = (chrono::Utc::now().date_naive() - chrono::Duration::days(1)).to_string();
    assert_eq!(body["date"], yesterday.as_str());
}
