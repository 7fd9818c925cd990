// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the similarity service

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Full version string with feature description
pub const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"), "-minilm-onnx");

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "cosine-similarity",
    "all-minilm-l6-v2",
    "onnx-runtime-cpu",
    "hf-hub-download",
    "session-pool",
    "graceful-shutdown",
];

/// Get formatted version information
pub fn get_version_info() -> String {
    format!("similarity-service {} (features: {})", VERSION, FEATURES.join(", "))
}
