//! Tests for the dashboard summary endpoint.

use chrono::{Duration, Utc};
use integration_tests::fixtures::{at_hour, ScanEventBuilder};
use integration_tests::setup::TestContext;
use serde_json::json;

#[tokio::test]
async fn summary_serves_real_aggregates_after_a_run() {
    let yesterday = Utc::now().date_naive() - Duration::days(1);
    let ctx = TestContext::with_events(vec![
        ScanEventBuilder::new("winery-1", "wine-a")
            .at(at_hour(yesterday, 9))
            .ip("198.51.100.1")
            .build(),
        ScanEventBuilder::new("winery-1", "wine-a")
            .at(at_hour(yesterday, 9))
            .ip("198.51.100.2")
            .build(),
        ScanEventBuilder::new("winery-1", "wine-b")
            .at(at_hour(yesterday, 19))
            .device("desktop")
            .language("de-DE")
            .geo("DE", "Bavaria", "Munich")
            .ip("198.51.100.3")
            .build(),
    ]);
    let server = ctx.server();

    server
        .post("/aggregate")
        .json(&json!({ "date": yesterday.to_string() }))
        .await
        .assert_status_ok();

    let response = server
        .get("/summary")
        .add_query_param("wineryId", "winery-1")
        .add_query_param("range", "7days")
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["sample"], false);
    assert_eq!(body["totalScans"], 3);
    assert_eq!(body["uniqueVisitors"], 3);
    assert_eq!(body["range"]["preset"], "7days");

    // Device shares: 2 mobile, 1 desktop.
    let devices = body["devices"].as_array().expect("devices array");
    assert_eq!(devices[0]["key"], "mobile");
    assert_eq!(devices[0]["count"], 2);
    assert_eq!(devices[0]["percent"], 67);

    // Language and country facets reflect the events.
    let languages = body["languages"].as_array().expect("languages array");
    assert_eq!(languages[0]["key"], "cs");
    assert_eq!(languages[0]["count"], 2);
    let countries = body["countries"].as_array().expect("countries array");
    assert_eq!(countries[0]["key"], "CZ");

    // Hourly distribution keeps all 24 buckets.
    let hourly = body["hourly"].as_array().expect("hourly array");
    assert_eq!(hourly.len(), 24);
    assert_eq!(hourly[9], 2);
    assert_eq!(hourly[19], 1);

    // Top wines come from the stored ranking.
    let top_wines = body["topWines"].as_array().expect("topWines array");
    assert_eq!(top_wines[0]["wineId"], "wine-a");
    assert_eq!(top_wines[0]["rank"], 1);
}

#[tokio::test]
async fn summary_falls_back_to_sample_data_for_new_wineries() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .get("/summary")
        .add_query_param("wineryId", "brand-new-winery")
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["sample"], true);
    assert_eq!(body["wineryId"], "brand-new-winery");
    // Default range applies when none is given.
    assert_eq!(body["range"]["preset"], "30days");
    assert!(body["totalScans"].as_u64().expect("totalScans") > 0);
    assert_eq!(body["hourly"].as_array().expect("hourly").len(), 24);
    assert!(!body["topWines"].as_array().expect("topWines").is_empty());
}

#[tokio::test]
async fn summary_rejects_unknown_range_preset() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .get("/summary")
        .add_query_param("wineryId", "winery-1")
        .add_query_param("range", "fortnight")
        .await;
    response.assert_status_bad_request();

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn summary_requires_winery_id() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/summary").await;
    // Missing required query parameter never reaches the handler.
    assert!(response.status_code().is_client_error());
}
