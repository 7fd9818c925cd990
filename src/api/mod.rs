// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod handlers;
pub mod http_server;
pub mod similarity;

pub use errors::{ApiError, ErrorResponse};
pub use handlers::HealthResponse;
pub use http_server::{create_app, serve, shutdown_signal, start_server, AppState};
pub use similarity::{similarity_handler, SimilarityRequest, SimilarityResponse};
