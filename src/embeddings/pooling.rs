// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Sentence pooling helpers shared by the ONNX model.
//!
//! The transformer emits one vector per token; a sentence embedding is the
//! attention-mask weighted mean of those vectors, scaled to unit length.

use ndarray::ArrayView2;

/// Mean pooling over the token axis of a `[seq_len, hidden_dim]` matrix.
///
/// Tokens with a zero attention mask do not contribute. Mask entries past the
/// end of `attention_mask` count as padding.
pub fn mean_pool(token_embeddings: ArrayView2<'_, f32>, attention_mask: &[i64]) -> Vec<f32> {
    let (seq_len, hidden_dim) = token_embeddings.dim();

    let mut pooled = vec![0.0f32; hidden_dim];
    let mut sum_mask = 0.0f32;

    for i in 0..seq_len {
        let mask_value = attention_mask.get(i).copied().unwrap_or(0) as f32;
        if mask_value == 0.0 {
            continue;
        }
        sum_mask += mask_value;
        for (acc, value) in pooled.iter_mut().zip(token_embeddings.row(i).iter()) {
            *acc += value * mask_value;
        }
    }

    // Avoid division by zero
    let denom = sum_mask.max(1e-9);
    for val in &mut pooled {
        *val /= denom;
    }

    pooled
}

/// In-place L2 normalization. A zero vector is left untouched.
pub fn l2_normalize_in_place(v: &mut [f32]) {
    let norm_sq: f32 = v.iter().map(|x| x * x).sum();
    if norm_sq > 0.0 {
        let inv_norm = norm_sq.sqrt().recip();
        for x in v.iter_mut() {
            *x *= inv_norm;
        }
    }
}

/// Euclidean norm of a vector.
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}
