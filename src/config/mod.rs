// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Service configuration
//!
//! Every option can be given as a command-line flag or an environment
//! variable (`.env` files are loaded by `main` before parsing).

use crate::embeddings::{
    EmbeddingModelConfig, DEFAULT_DIMENSION, DEFAULT_MAX_TOKENS, DEFAULT_MODEL_ID,
};
use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Semantic similarity service
#[derive(Parser, Debug, Clone)]
#[command(name = "similarity-service")]
#[command(version)]
#[command(about = "Scores the semantic similarity of two texts in [0, 1]", long_about = None)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8000")]
    pub listen_addr: SocketAddr,

    /// HuggingFace repository of the sentence-embedding model
    #[arg(long, env = "EMBEDDING_MODEL_ID", default_value = DEFAULT_MODEL_ID)]
    pub model_id: String,

    /// Local directory with model.onnx and tokenizer.json (skips the hub)
    #[arg(long, env = "EMBEDDING_MODEL_DIR")]
    pub model_dir: Option<PathBuf>,

    /// hf-hub cache directory
    #[arg(long, env = "EMBEDDING_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Never download model files
    #[arg(long, env = "EMBEDDING_OFFLINE", default_value_t = false)]
    pub offline: bool,

    /// Token limit per input; longer texts are truncated
    #[arg(long, env = "EMBEDDING_MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: usize,

    /// Expected embedding dimension, verified at startup
    #[arg(long, env = "EMBEDDING_DIMENSION", default_value_t = DEFAULT_DIMENSION)]
    pub dimension: usize,

    /// ONNX Runtime intra-op threads per session
    #[arg(long, env = "ONNX_INTRA_THREADS", default_value_t = 4)]
    pub intra_threads: usize,

    /// ONNX sessions available for concurrent requests
    #[arg(long, env = "ONNX_SESSIONS", default_value_t = 2)]
    pub sessions: usize,
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.model_id.trim().is_empty() {
            anyhow::bail!("model id cannot be empty");
        }
        for (name, value) in [
            ("max-tokens", self.max_tokens),
            ("dimension", self.dimension),
            ("intra-threads", self.intra_threads),
            ("sessions", self.sessions),
        ] {
            if value == 0 {
                anyhow::bail!("{} must be greater than 0", name);
            }
        }
        Ok(())
    }

    pub fn embedding_config(&self) -> EmbeddingModelConfig {
        EmbeddingModelConfig {
            model_id: self.model_id.clone(),
            model_dir: self.model_dir.clone(),
            cache_dir: self.cache_dir.clone(),
            offline: self.offline,
            max_tokens: self.max_tokens,
            dimension: self.dimension,
            intra_threads: self.intra_threads,
            sessions: self.sessions,
        }
    }
}
