// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use similarity_service::{
    api::{shutdown_signal, start_server, AppState},
    config::ServiceConfig,
    embeddings::OnnxEmbeddingModel,
    version,
};
use std::{env, sync::Arc};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let config = ServiceConfig::parse();
    config.validate().context("Invalid configuration")?;

    info!("🚀 Starting {}", version::get_version_info());

    // The model must be fully loaded before the listener is bound
    let embedding_config = config.embedding_config();
    info!(model = %embedding_config.model_id, "🧠 Loading embedding model...");
    let model = OnnxEmbeddingModel::load(&embedding_config)
        .await
        .context("Failed to load embedding model")?;
    info!(
        model = %model.model_name(),
        dimension = model.dimension(),
        max_tokens = model.max_length(),
        "✅ Embedding model ready"
    );

    let state = AppState::new(Arc::new(model));

    info!("  Health:       GET  http://{}/health", config.listen_addr);
    info!("  Similarity:   POST http://{}/similarity", config.listen_addr);

    start_server(config.listen_addr, state, shutdown_signal()).await?;

    info!("👋 Goodbye!");
    Ok(())
}
