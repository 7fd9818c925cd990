// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /similarity endpoint tests
//!
//! These tests drive the router with a deterministic bag-of-words provider
//! and verify:
//! - Scores stay within [0, 1] and are symmetric
//! - Missing or null fields behave like empty strings
//! - Malformed bodies produce client errors with a validation body
//! - Embedding failures produce a 500 without leaking the cause, and the
//!   service keeps serving afterwards

use super::common::{body_json, flaky_app, json_post, test_app};
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use similarity_service::api::SimilarityResponse;
use tower::ServiceExt; // for `oneshot`

async fn score(body: &str) -> f32 {
    let response = test_app()
        .oneshot(json_post("/similarity", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK, "body: {}", body);

    let json = body_json(response).await;
    let parsed: SimilarityResponse = serde_json::from_value(json).unwrap();
    parsed.similarity01
}

// ========== SUCCESS CASES ==========

#[tokio::test]
async fn test_identical_texts_score_one() {
    let similarity = score(r#"{"a": "The cat sat on the mat.", "b": "The cat sat on the mat."}"#).await;
    assert!(
        (similarity - 1.0).abs() < 1e-6,
        "identical texts should score ~1.0, got {}",
        similarity
    );
}

#[tokio::test]
async fn test_unrelated_texts_score_low() {
    let similarity = score(
        r#"{"a": "I love sunny days.", "b": "Quantum mechanics describes subatomic particles."}"#,
    )
    .await;
    assert!((0.0..0.5).contains(&similarity), "got {}", similarity);
}

#[tokio::test]
async fn test_response_shape() {
    let response = test_app()
        .oneshot(json_post("/similarity", r#"{"a": "x", "b": "y"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 1);
    assert!(object["similarity01"].is_number());
}

#[tokio::test]
async fn test_symmetric() {
    let ab = score(r#"{"a": "red apples and green pears", "b": "green apples"}"#).await;
    let ba = score(r#"{"a": "green apples", "b": "red apples and green pears"}"#).await;
    assert_eq!(ab, ba);
    assert!(ab > 0.0 && ab < 1.0);
}

#[tokio::test]
async fn test_empty_strings_return_defined_value() {
    let similarity = score(r#"{"a": "", "b": ""}"#).await;
    assert!((0.0..=1.0).contains(&similarity));
}

#[tokio::test]
async fn test_missing_field_equals_empty_string() {
    let omitted = score(r#"{"b": "hello world"}"#).await;
    let empty = score(r#"{"a": "", "b": "hello world"}"#).await;
    let null = score(r#"{"a": null, "b": "hello world"}"#).await;

    assert_eq!(omitted, empty);
    assert_eq!(null, empty);
}

#[tokio::test]
async fn test_empty_object_is_accepted() {
    let similarity = score("{}").await;
    assert!((0.0..=1.0).contains(&similarity));
}

// ========== CLIENT ERRORS ==========

#[tokio::test]
async fn test_number_field_is_validation_error() {
    let response = test_app()
        .oneshot(json_post("/similarity", r#"{"a": 123, "b": "text"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["error_type"], "validation_error");
    assert_eq!(json["details"]["field"], "a");
    assert_eq!(json["message"], "a must be a string, got number");
    assert!(json["request_id"].is_string());
}

#[tokio::test]
async fn test_non_object_body_is_validation_error() {
    let response = test_app()
        .oneshot(json_post("/similarity", r#"["a", "b"]"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["details"]["field"], "body");
}

#[tokio::test]
async fn test_invalid_json_is_bad_request() {
    let response = test_app()
        .oneshot(json_post("/similarity", r#"{"a": "unterminated"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error_type"], "invalid_request");
}

#[tokio::test]
async fn test_missing_content_type_is_bad_request() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/similarity")
        .body(Body::from(r#"{"a": "x", "b": "y"}"#))
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_is_method_not_allowed() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/similarity")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let response = test_app()
        .oneshot(json_post("/v1/similarity", r#"{"a": "x"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["error_type"], "not_found");
}

// ========== SERVER ERRORS ==========

#[tokio::test]
async fn test_encoding_failure_is_internal_error() {
    let app = flaky_app();

    let response = app
        .clone()
        .oneshot(json_post("/similarity", r#"{"a": "boom", "b": "fine"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["error_type"], "internal_error");
    assert!(json["request_id"].is_string());
    assert!(
        !json["message"].as_str().unwrap().contains("/models/secret"),
        "cause must not leak to callers"
    );

    // Service remains usable
    let response = app
        .oneshot(json_post("/similarity", r#"{"a": "fine", "b": "fine"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let app = test_app();

    let mut handles = Vec::new();
    for i in 0..16 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let body = format!(r#"{{"a": "word{i} shared", "b": "word{i} shared"}}"#);
            let response = app.oneshot(json_post("/similarity", &body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            body_json(response).await["similarity01"].as_f64().unwrap()
        }));
    }

    for handle in handles {
        let similarity = handle.await.unwrap();
        assert!((similarity - 1.0).abs() < 1e-6);
    }
}
