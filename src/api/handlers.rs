// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, http::Uri, Json};
use serde::{Deserialize, Serialize};

use super::http_server::AppState;
use super::ApiError;
use crate::version;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub dimension: usize,
    pub version: String,
    pub uptime_seconds: u64,
}

/// GET /health
///
/// The model is loaded before the server binds, so a reachable service is
/// always able to score.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let model = state.scorer.model_info();
    Json(HealthResponse {
        status: "healthy".to_string(),
        model: model.name,
        dimension: model.dimension,
        version: version::VERSION_NUMBER.to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

/// Fallback for unknown routes
pub async fn not_found_handler(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
