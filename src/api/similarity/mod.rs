// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Similarity API Module
//!
//! This module provides the POST /similarity endpoint returning the cosine
//! similarity of two texts' all-MiniLM-L6-v2 embeddings, clamped to [0, 1].

pub mod handler;
pub mod request;
pub mod response;

pub use handler::similarity_handler;
pub use request::SimilarityRequest;
pub use response::SimilarityResponse;
