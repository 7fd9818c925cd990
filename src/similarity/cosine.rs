// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

use super::SimilarityError;

/// Cosine similarity dot(a, b) / (|a| * |b|), accumulated in f64.
///
/// Does not assume either vector is normalized. Returns 0.0 when either
/// vector has zero magnitude (including empty vectors).
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, SimilarityError> {
    if a.len() != b.len() {
        return Err(SimilarityError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())) as f32)
}

/// Clamps a raw cosine value into [0.0, 1.0].
///
/// Negative similarity floors to 0 and rounding overshoot caps at 1.
/// NaN and infinities are rejected rather than clamped.
pub fn clamp_unit(raw: f32) -> Result<f32, SimilarityError> {
    if !raw.is_finite() {
        return Err(SimilarityError::NonFinite(raw));
    }
    Ok(raw.clamp(0.0, 1.0))
}
