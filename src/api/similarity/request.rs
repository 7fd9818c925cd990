// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! SimilarityRequest type for POST /similarity
//!
//! Both fields are optional; an absent or `null` field is the empty string.
//! Any other non-string value is a validation error naming the field.

use crate::api::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for POST /similarity
///
/// # Example
/// ```json
/// { "a": "The cat sat on the mat.", "b": "A cat was sitting on a mat." }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarityRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<String>,
}

impl SimilarityRequest {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            a: Some(a.into()),
            b: Some(b.into()),
        }
    }

    /// The two texts to compare, with missing fields as "".
    pub fn texts(&self) -> (&str, &str) {
        (
            self.a.as_deref().unwrap_or_default(),
            self.b.as_deref().unwrap_or_default(),
        )
    }
}

impl TryFrom<Value> for SimilarityRequest {
    type Error = ApiError;

    fn try_from(body: Value) -> Result<Self, Self::Error> {
        let fields = match body {
            Value::Object(fields) => fields,
            other => {
                return Err(ApiError::ValidationError {
                    field: "body".to_string(),
                    message: format!("request body must be a JSON object, got {}", kind(&other)),
                })
            }
        };

        let text_field = |name: &str| -> Result<Option<String>, ApiError> {
            match fields.get(name) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::String(text)) => Ok(Some(text.clone())),
                Some(other) => Err(ApiError::ValidationError {
                    field: name.to_string(),
                    message: format!("{} must be a string, got {}", name, kind(other)),
                }),
            }
        };

        Ok(Self {
            a: text_field("a")?,
            b: text_field("b")?,
        })
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
