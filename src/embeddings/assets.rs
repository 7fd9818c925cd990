// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Model asset resolution
//!
//! Locates the ONNX export and tokenizer for the configured model. Files are
//! taken from an explicit local directory when one is configured, otherwise
//! from the hf-hub cache, downloading into the cache when they are missing
//! and offline mode is off.

use crate::embeddings::EmbeddingModelConfig;
use anyhow::{Context, Result};
use hf_hub::api::sync::ApiBuilder;
use hf_hub::{Cache, Repo, RepoType};
use std::path::{Path, PathBuf};
use tracing::info;

/// Repository-relative path of the ONNX export.
pub const ONNX_MODEL_FILE: &str = "onnx/model.onnx";

/// Repository-relative path of the tokenizer definition.
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Resolved on-disk locations of the model files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelAssets {
    pub model_path: PathBuf,
    pub tokenizer_path: PathBuf,
}

/// Resolves model files for `config`, downloading them if needed.
///
/// Downloading is blocking network I/O and runs on the blocking pool.
pub async fn resolve_model_assets(config: &EmbeddingModelConfig) -> Result<ModelAssets> {
    if let Some(dir) = &config.model_dir {
        return local_assets(dir);
    }

    let repo = Repo::new(config.model_id.clone(), RepoType::Model);
    let cache = match &config.cache_dir {
        Some(dir) => Cache::new(dir.clone()),
        None => Cache::default(),
    };

    if let Some(assets) = cached_assets(&cache, &repo) {
        info!(
            model = %config.model_id,
            path = %assets.model_path.display(),
            "Using cached embedding model"
        );
        return Ok(assets);
    }

    if config.offline {
        anyhow::bail!(
            "Model {} is not in the local cache and offline mode is enabled",
            config.model_id
        );
    }

    let model_id = config.model_id.clone();
    let cache_dir = config.cache_dir.clone();
    tokio::task::spawn_blocking(move || download_assets(&model_id, repo, cache_dir))
        .await
        .context("Model download task panicked")?
}

/// Looks for `model.onnx` (or `onnx/model.onnx`) and `tokenizer.json` in `dir`.
pub fn local_assets(dir: &Path) -> Result<ModelAssets> {
    let model_path = [dir.join("model.onnx"), dir.join(ONNX_MODEL_FILE)]
        .into_iter()
        .find(|candidate| candidate.is_file())
        .with_context(|| format!("ONNX model file not found in {}", dir.display()))?;

    let tokenizer_path = dir.join(TOKENIZER_FILE);
    if !tokenizer_path.is_file() {
        anyhow::bail!("Tokenizer file not found: {}", tokenizer_path.display());
    }

    Ok(ModelAssets {
        model_path,
        tokenizer_path,
    })
}

fn cached_assets(cache: &Cache, repo: &Repo) -> Option<ModelAssets> {
    let cached = cache.repo(repo.clone());
    Some(ModelAssets {
        model_path: cached.get(ONNX_MODEL_FILE)?,
        tokenizer_path: cached.get(TOKENIZER_FILE)?,
    })
}

fn download_assets(model_id: &str, repo: Repo, cache_dir: Option<PathBuf>) -> Result<ModelAssets> {
    info!(model = %model_id, "Downloading embedding model from HuggingFace hub");

    let mut builder = ApiBuilder::new().with_progress(false);
    if let Some(dir) = cache_dir {
        builder = builder.with_cache_dir(dir);
    }
    let api = builder.build().context("Failed to create hf-hub client")?;
    let api_repo = api.repo(repo);

    let model_path = api_repo
        .get(ONNX_MODEL_FILE)
        .with_context(|| format!("Failed to download {}", ONNX_MODEL_FILE))?;
    let tokenizer_path = api_repo
        .get(TOKENIZER_FILE)
        .with_context(|| format!("Failed to download {}", TOKENIZER_FILE))?;

    info!(path = %model_path.display(), "Embedding model downloaded");

    Ok(ModelAssets {
        model_path,
        tokenizer_path,
    })
}
