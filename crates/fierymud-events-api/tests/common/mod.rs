//! Shared test helpers for relay API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, TimeZone, Utc};
use fierymud_events_core::clock::Clock;
use fierymud_events_core::config::PublisherConfig;
use fierymud_events_publisher::EventPublisher;
use fierymud_events_test_support::{FixedClock, RecordingTransport, TransportLog};
use http_body_util::BodyExt;
use tower::ServiceExt;

use fierymud_events_api::build_router;
use fierymud_events_api::state::AppState;

/// Fixed timestamp used across all integration tests.
pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(fixed_time()))
}

/// A relay wired to an in-memory transport.
pub struct TestRelay {
    pub app: Router,
    pub publisher: Arc<EventPublisher>,
    pub log: TransportLog,
}

/// Build the full app router over a running publisher backed by a
/// `RecordingTransport`.
pub fn build_test_app() -> TestRelay {
    build_test_app_with_config(PublisherConfig {
        host: "localhost".to_owned(),
        poll_interval: Duration::from_millis(10),
        ..PublisherConfig::default()
    })
}

/// Build the full app router with a custom publisher configuration.
pub fn build_test_app_with_config(config: PublisherConfig) -> TestRelay {
    let transport = RecordingTransport::new();
    let log = transport.log();
    let publisher = Arc::new(EventPublisher::with_clock(transport, fixed_clock()));
    publisher.initialize(config).unwrap();

    let app = build_router(AppState::new(Arc::clone(&publisher), fixed_clock()));

    TestRelay {
        app,
        publisher,
        log,
    }
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
