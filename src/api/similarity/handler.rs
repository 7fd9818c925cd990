// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /similarity HTTP handler

use crate::api::http_server::AppState;
use crate::api::similarity::{SimilarityRequest, SimilarityResponse};
use crate::api::ApiError;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// POST /similarity handler
///
/// Scores how semantically close two texts are.
///
/// # Request Body
/// ```json
/// { "a": "I love sunny days.", "b": "The weather is lovely today." }
/// ```
///
/// # Response Body
/// ```json
/// { "similarity01": 0.61 }
/// ```
///
/// # Errors
/// - 400 `invalid_request`: body is not valid JSON or has the wrong content type
/// - 422 `validation_error`: body is not an object, or `a`/`b` is not a string
/// - 500 `internal_error`: embedding or scoring failed (cause is logged)
pub async fn similarity_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let request_id = Uuid::new_v4().to_string();

    let request = match payload
        .map_err(ApiError::from)
        .and_then(|Json(body)| SimilarityRequest::try_from(body))
    {
        Ok(request) => request,
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "Rejected similarity request");
            return e.into_http_response(Some(request_id));
        }
    };

    let (a, b) = request.texts();
    let started = Instant::now();

    match state.scorer.compute_similarity(a, b).await {
        Ok(similarity01) => {
            debug!(
                request_id = %request_id,
                len_a = a.len(),
                len_b = b.len(),
                similarity01,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Similarity computed"
            );
            Json(SimilarityResponse::new(similarity01)).into_response()
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "Similarity computation failed");
            ApiError::from(e).into_http_response(Some(request_id))
        }
    }
}
