// Copyright 2026 Parcel Tracker Contributors
// SPDX-License-Identifier: Apache-2.0

//! Router tests driven through `tower::ServiceExt::oneshot`; no sockets.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use parcel_tracker::{EngineConfig, Orchestrator};
use parcel_tracker_server::rest::router;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    router(Arc::new(Orchestrator::new(EngineConfig {
        deadline_ms: 2_000,
        synthetic_seed: Some(5),
        ..EngineConfig::default()
    })))
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1 << 20).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_track(body: &str) -> (StatusCode, Value) {
    let request = Request::post("/api/track")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(request).await
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = send(Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn carriers_lists_all_twenty() {
    let (status, body) = send(Request::get("/api/carriers").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);

    let carriers = body["carriers"].as_array().unwrap();
    assert_eq!(carriers.len(), 20);
    let honam = carriers.iter().find(|c| c["id"] == "honam").unwrap();
    assert_eq!(honam["realtime"], false);
    let epost = carriers.iter().find(|c| c["id"] == "koreapost").unwrap();
    assert_eq!(epost["realtime"], true);
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    for body in [
        r#"{}"#,
        r#"{"carrier":"lotte"}"#,
        r#"{"trackingNumber":"123"}"#,
        r#"{"carrier":"lotte","trackingNumber":"  "}"#,
    ] {
        let (status, json) = post_track(body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(
            json["error"],
            "Please enter both the tracking number and the carrier."
        );
    }
}

#[tokio::test]
async fn unknown_carrier_is_rejected() {
    let (status, json) = post_track(r#"{"carrier":"fedex","trackingNumber":"123"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Unsupported carrier.");
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let (status, json) = post_track("{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn synthetic_only_carrier_returns_degraded_result() {
    let (status, json) = post_track(r#"{"carrier":"honam","trackingNumber":"5550001"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["carrier"], "honam");
    assert_eq!(json["degraded"], true);
    assert_eq!(json["source"], "synthetic");
    assert!(json["error"].as_str().unwrap().contains("not supported"));
    let progresses = json["progresses"].as_array().unwrap();
    assert!((2..=4).contains(&progresses.len()));
    assert_eq!(json["currentStatus"], progresses[0]["status"]);
}
