// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! GET /health endpoint tests

use super::common::{body_json, test_app, TEST_DIMENSION};
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use similarity_service::api::HealthResponse;
use tower::ServiceExt;

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health_reports_model() {
    let response = test_app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let health: HealthResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.model, "bag-of-words");
    assert_eq!(health.dimension, TEST_DIMENSION);
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_uses_camel_case() {
    let response = test_app().oneshot(get("/health")).await.unwrap();
    let json = body_json(response).await;

    assert!(json.get("uptimeSeconds").is_some());
    assert!(json.get("uptime_seconds").is_none());
}

#[tokio::test]
async fn test_health_rejects_post() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_cors_headers_present() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .header("origin", "http://example.com")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}
