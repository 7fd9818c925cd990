// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX Embedding Model Wrapper
//!
//! This module provides a wrapper around ONNX Runtime for running
//! the all-MiniLM-L6-v2 sentence transformer model.
//!
//! Features:
//! - ONNX model loading from disk (CPU execution provider)
//! - BERT tokenization with truncation to a fixed token budget
//! - Mean pooling over token embeddings followed by L2 normalization
//! - A small pool of sessions so concurrent requests do not serialize

use crate::embeddings::pooling::{l2_normalize_in_place, mean_pool};
use crate::embeddings::{
    resolve_model_assets, EmbeddingModelConfig, EmbeddingProvider, ModelAssets, ModelInfo,
};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use ndarray::{Array2, Axis, Ix2};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

/// Sessions shared by concurrent requests.
///
/// `Session::run` needs exclusive access, so each session sits behind its
/// own mutex. Callers take the first idle session and otherwise queue on one
/// picked round-robin.
struct SessionPool {
    sessions: Vec<Mutex<Session>>,
    next: AtomicUsize,
}

impl SessionPool {
    fn run<R>(&self, f: impl FnOnce(&mut Session) -> Result<R>) -> Result<R> {
        for slot in &self.sessions {
            if let Ok(mut session) = slot.try_lock() {
                return f(&mut *session);
            }
        }

        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.sessions.len();
        let mut session = self.sessions[index]
            .lock()
            .map_err(|_| anyhow!("ONNX session {} lock poisoned", index))?;
        f(&mut *session)
    }
}

/// ONNX-based embedding model (all-MiniLM-L6-v2)
///
/// The model uses a sentence transformer architecture with:
/// - BERT-based tokenizer
/// - Mean pooling over token embeddings
/// - L2 normalization (applied here, the ONNX graph returns raw token states)
///
/// # Model Details
/// - Input: Text strings (truncated to `max_tokens` word pieces)
/// - Output: 384-dimensional unit-norm f32 vectors
/// - Provider: CPU (ONNX Runtime)
///
/// # Thread Safety
/// All fields are wrapped in Arc for cheap cloning and thread-safe sharing.
#[derive(Clone)]
pub struct OnnxEmbeddingModel {
    /// ONNX Runtime sessions
    sessions: Arc<SessionPool>,

    /// BERT tokenizer with truncation configured
    tokenizer: Arc<Tokenizer>,

    /// Model name (e.g., "all-MiniLM-L6-v2")
    model_name: String,

    /// Output dimension, checked against a probe inference at load time
    dimension: usize,

    /// Maximum sequence length in tokens
    max_length: usize,
}

impl std::fmt::Debug for OnnxEmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbeddingModel")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .field("max_length", &self.max_length)
            .field("sessions", &self.sessions.sessions.len())
            .finish_non_exhaustive()
    }
}

impl OnnxEmbeddingModel {
    /// Resolves the model files for `config` and loads them.
    ///
    /// This is the startup entry point: any error here means the service
    /// must not start.
    pub async fn load(config: &EmbeddingModelConfig) -> Result<Self> {
        let assets = resolve_model_assets(config)
            .await
            .with_context(|| format!("Failed to resolve model files for {}", config.model_id))?;

        Self::from_assets(config, assets).await
    }

    /// Loads the model from already resolved files.
    ///
    /// Session creation and the validation probe are CPU-bound and run on the
    /// blocking pool.
    pub async fn from_assets(config: &EmbeddingModelConfig, assets: ModelAssets) -> Result<Self> {
        let config = config.clone();
        tokio::task::spawn_blocking(move || Self::load_blocking(&config, &assets))
            .await
            .context("Model loading task panicked")?
    }

    fn load_blocking(config: &EmbeddingModelConfig, assets: &ModelAssets) -> Result<Self> {
        if config.sessions == 0 {
            anyhow::bail!("At least one ONNX session is required");
        }
        if config.max_tokens == 0 {
            anyhow::bail!("max_tokens must be greater than 0");
        }

        let model_name = config.display_name().to_string();
        let started = Instant::now();
        info!(
            model = %model_name,
            path = %assets.model_path.display(),
            sessions = config.sessions,
            "Loading ONNX embedding model"
        );

        let mut tokenizer = Tokenizer::from_file(&assets.tokenizer_path).map_err(|e| {
            anyhow!(
                "Failed to load tokenizer from {}: {}",
                assets.tokenizer_path.display(),
                e
            )
        })?;
        tokenizer
            .with_padding(None)
            .with_truncation(Some(TruncationParams {
                max_length: config.max_tokens,
                ..Default::default()
            }))
            .map_err(|e| anyhow!("Failed to configure tokenizer truncation: {}", e))?;

        let mut sessions = Vec::with_capacity(config.sessions);
        for _ in 0..config.sessions {
            sessions.push(Mutex::new(create_session(
                &assets.model_path,
                config.intra_threads,
            )?));
        }

        let model = Self {
            sessions: Arc::new(SessionPool {
                sessions,
                next: AtomicUsize::new(0),
            }),
            tokenizer: Arc::new(tokenizer),
            model_name,
            dimension: config.dimension,
            max_length: config.max_tokens,
        };

        // Probe inference: the hidden size must match the configured dimension
        let probe = model.embed_blocking("validation test")?;
        if probe.len() != config.dimension {
            anyhow::bail!(
                "Model outputs {} dimensions (expected {})",
                probe.len(),
                config.dimension
            );
        }

        info!(
            model = %model.model_name,
            dimension = model.dimension,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "✅ ONNX embedding model loaded successfully"
        );

        Ok(model)
    }

    /// Generates a unit-norm embedding for a single text on the current thread.
    ///
    /// # Implementation
    /// 1. Tokenize input with BERT tokenizer (truncation to max_length)
    /// 2. Run ONNX inference
    /// 3. Mean pooling over tokens, weighted by the attention mask
    /// 4. L2 normalization
    pub fn embed_blocking(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow!("Tokenization failed: {}", e))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        let token_type_ids: Vec<i64> = vec![0i64; input_ids.len()];
        let seq_len = input_ids.len();

        let input_ids_array = Array2::from_shape_vec((1, seq_len), input_ids)
            .context("Failed to create input_ids array")?;
        let attention_mask_array = Array2::from_shape_vec((1, seq_len), attention_mask.clone())
            .context("Failed to create attention_mask array")?;
        let token_type_ids_array = Array2::from_shape_vec((1, seq_len), token_type_ids)
            .context("Failed to create token_type_ids array")?;

        let mut embedding = self.sessions.run(|session| {
            let outputs = session.run(ort::inputs![
                "input_ids" => Value::from_array(input_ids_array)?,
                "attention_mask" => Value::from_array(attention_mask_array)?,
                "token_type_ids" => Value::from_array(token_type_ids_array)?
            ])?;

            // Use index [0] instead of name since exports differ in output names
            let output_array = outputs[0]
                .try_extract_array::<f32>()
                .context("Failed to extract output tensor")?;

            // Token-level embeddings: [batch, seq_len, hidden_dim]
            if output_array.ndim() != 3 {
                anyhow::bail!(
                    "Model outputs unexpected shape: {:?} (expected [batch, seq_len, hidden])",
                    output_array.shape()
                );
            }

            let tokens = output_array
                .index_axis(Axis(0), 0)
                .into_dimensionality::<Ix2>()
                .context("Failed to view token embeddings as a matrix")?;

            Ok(mean_pool(tokens, &attention_mask))
        })?;

        l2_normalize_in_place(&mut embedding);

        debug!(
            model = %self.model_name,
            tokens = seq_len,
            "Generated embedding"
        );

        Ok(embedding)
    }

    /// Counts tokens in a text string after truncation (special tokens included)
    pub fn count_tokens(&self, text: &str) -> Result<usize> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow!("Tokenization failed: {}", e))?;

        Ok(encoding.get_attention_mask().iter().map(|&m| m as usize).sum())
    }

    /// Returns the output dimension of this model
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the model name
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Returns the truncation limit in tokens
    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

#[async_trait]
impl EmbeddingProvider for OnnxEmbeddingModel {
    async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let model = self.clone();
        let text = text.to_owned();

        let embedding = tokio::task::spawn_blocking(move || model.embed_blocking(&text))
            .await
            .context("Embedding task panicked")??;

        if embedding.len() != self.dimension {
            anyhow::bail!(
                "Unexpected embedding dimension: {} (expected {})",
                embedding.len(),
                self.dimension
            );
        }

        Ok(embedding)
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            name: self.model_name.clone(),
            dimension: self.dimension,
        }
    }
}

fn create_session(model_path: &Path, intra_threads: usize) -> Result<Session> {
    Session::builder()
        .context("Failed to create session builder")?
        .with_execution_providers([CPUExecutionProvider::default().build()])
        .context("Failed to set CPU execution provider")?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .context("Failed to set optimization level")?
        .with_intra_threads(intra_threads)
        .context("Failed to set intra threads")?
        .commit_from_file(model_path)
        .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))
}
