//! Decoding of failed API responses.
//!
//! The dashboard API reports failures with a non-2xx status and, for 4xx
//! responses, a JSON body carrying either per-field errors
//! (`{"errors": {"email": "has already been taken"}}`) or a single
//! `{"message": "..."}`.

use std::fmt;

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::{FieldErrors, InterEdError};
use crate::types::EntityId;

/// A failed API round trip, before it is classified into an [`InterEdError`]
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code, if available
    pub status: Option<StatusCode>,
    /// Human-readable error message
    pub message: String,
    /// Per-field messages decoded from the body
    pub fields: FieldErrors,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            fields: FieldErrors::new(),
        }
    }

    pub fn with_status(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
            fields: FieldErrors::new(),
        }
    }

    /// Decode a non-2xx response body.
    ///
    /// Field messages may be strings or arrays of strings. Bodies that are
    /// not JSON fall back to the status' canonical reason.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let fallback = status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string();
        let mut error = Self::with_status(fallback, status);

        let Ok(json) = serde_json::from_str::<Value>(body) else {
            return error;
        };

        if let Some(message) = json.get("message").and_then(Value::as_str) {
            error.message = message.to_string();
        }

        if let Some(Value::Object(errors)) = json.get("errors") {
            for (field, value) in errors {
                let message = match value {
                    Value::String(s) => s.clone(),
                    Value::Array(items) => items
                        .iter()
                        .filter_map(Value::as_str)
                        .collect::<Vec<_>>()
                        .join("; "),
                    other => other.to_string(),
                };
                error.fields.insert(field.clone(), message);
            }
        }

        error
    }

    /// Classify into the crate error.
    ///
    /// A 404 on a single-entity path becomes `NotFound`; a body with field
    /// errors becomes `Validation`; everything else is `Api`.
    pub fn into_error(self, collection: &str, id: Option<EntityId>) -> InterEdError {
        let status = self.status.map(|s| s.as_u16()).unwrap_or(0);

        if let (404, Some(id)) = (status, id) {
            return InterEdError::NotFound {
                collection: collection.to_string(),
                id,
            };
        }

        if !self.fields.is_empty() {
            return InterEdError::Validation(self.fields);
        }

        InterEdError::Api {
            status,
            message: self.message,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
