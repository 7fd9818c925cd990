// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Semantic similarity scoring
//!
//! Encodes both texts with the configured [`EmbeddingProvider`], takes the
//! cosine similarity of the two embeddings and clamps it into [0, 1].

pub mod cosine;

use crate::embeddings::{EmbeddingProvider, ModelInfo};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

pub use cosine::{clamp_unit, cosine_similarity};

#[derive(Debug, Error)]
pub enum SimilarityError {
    #[error("Embedding failed: {0:#}")]
    Embedding(anyhow::Error),

    #[error("Embedding dimensions differ: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Similarity is not a finite number: {0}")]
    NonFinite(f32),
}

/// Stateless scorer over a shared, read-only embedding provider
#[derive(Clone)]
pub struct SimilarityScorer {
    provider: Arc<dyn EmbeddingProvider>,
}

impl std::fmt::Debug for SimilarityScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimilarityScorer")
            .field("model", &self.provider.model_info())
            .finish()
    }
}

impl SimilarityScorer {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }

    pub fn model_info(&self) -> ModelInfo {
        self.provider.model_info()
    }

    /// Scores how semantically close `a` and `b` are, in [0.0, 1.0].
    ///
    /// Both texts are encoded concurrently. Empty strings are valid input.
    pub async fn compute_similarity(&self, a: &str, b: &str) -> Result<f32, SimilarityError> {
        let (emb_a, emb_b) = tokio::try_join!(self.provider.encode(a), self.provider.encode(b))
            .map_err(SimilarityError::Embedding)?;

        let raw = cosine_similarity(&emb_a, &emb_b)?;
        let score = clamp_unit(raw)?;

        debug!(raw, score, "Computed cosine similarity");

        Ok(score)
    }
}
