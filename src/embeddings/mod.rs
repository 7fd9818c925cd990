// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding provider abstraction and the ONNX-backed implementation.
//!
//! Callers depend only on [`EmbeddingProvider`]; the concrete model
//! (all-MiniLM-L6-v2 via ONNX Runtime) is wired in once at startup.

pub mod assets;
pub mod onnx_model;
pub mod pooling;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use assets::{resolve_model_assets, ModelAssets};
pub use onnx_model::OnnxEmbeddingModel;

/// Default HuggingFace model identifier.
pub const DEFAULT_MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Output dimension of all-MiniLM-L6-v2.
pub const DEFAULT_DIMENSION: usize = 384;

/// Maximum word-piece tokens fed to the encoder; longer inputs are truncated.
pub const DEFAULT_MAX_TOKENS: usize = 256;

/// Descriptive metadata for a loaded embedding model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model name (e.g., "all-MiniLM-L6-v2")
    pub name: String,
    /// Embedding dimensions
    pub dimension: usize,
}

/// Maps a text to a fixed-length, unit-norm embedding vector.
///
/// Implementations must be safe to share across concurrent requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Encodes `text` (possibly empty) into an embedding of `model_info().dimension` floats.
    async fn encode(&self, text: &str) -> Result<Vec<f32>>;

    /// Returns the name and output dimension of the underlying model.
    fn model_info(&self) -> ModelInfo;
}

/// Configuration for loading the embedding model
#[derive(Debug, Clone)]
pub struct EmbeddingModelConfig {
    /// HuggingFace repository id (e.g., "sentence-transformers/all-MiniLM-L6-v2")
    pub model_id: String,
    /// Local directory holding `model.onnx` and `tokenizer.json`; bypasses the hub
    pub model_dir: Option<PathBuf>,
    /// hf-hub cache directory; `None` uses the hf-hub default
    pub cache_dir: Option<PathBuf>,
    /// Never download; only local or cached files are used
    pub offline: bool,
    /// Truncation limit in tokens
    pub max_tokens: usize,
    /// Expected embedding dimensions, checked at load time
    pub dimension: usize,
    /// ONNX Runtime intra-op threads per session
    pub intra_threads: usize,
    /// Number of ONNX sessions available for concurrent inference
    pub sessions: usize,
}

impl EmbeddingModelConfig {
    /// Short display name derived from the repository id ("all-MiniLM-L6-v2").
    pub fn display_name(&self) -> &str {
        self.model_id
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.model_id)
    }
}

impl Default for EmbeddingModelConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            model_dir: None,
            cache_dir: None,
            offline: false,
            max_tokens: DEFAULT_MAX_TOKENS,
            dimension: DEFAULT_DIMENSION,
            intra_threads: 4,
            sessions: 2,
        }
    }
}
