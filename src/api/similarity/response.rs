// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! SimilarityResponse type for POST /similarity

use serde::{Deserialize, Serialize};

/// Response body for POST /similarity
///
/// # Example
/// ```json
/// { "similarity01": 0.8731 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResponse {
    /// Cosine similarity clamped into [0.0, 1.0]
    pub similarity01: f32,
}

impl SimilarityResponse {
    pub fn new(similarity01: f32) -> Self {
        Self { similarity01 }
    }
}
