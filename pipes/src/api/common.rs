//! Common types and utilities for the Pipes API

use serde::{Deserialize, Serialize};

/// Error body returned by the API on non-2xx responses
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub status: Option<u16>,
    pub title: Option<String>,
    pub detail: Option<String>,
    pub instance: Option<String>,
    pub validation_errors: Option<Vec<ValidationError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidationError {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
#[error("API error details: {}", format_validation_errors(.errors))]
pub struct ApiErrorDetails {
    pub errors: Vec<ValidationError>,
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.location, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// One field of a PATCH body: `None` leaves the field alone, `Some(None)`
/// sends an explicit null that clears it
pub type Patch<T> = Option<Option<T>>;

/// One page of a list endpoint
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    pub items: Option<Vec<T>>,
    pub next_token: Option<String>,
}

/// Timestamps and authorship stamped on most entities
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Audit {
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub created_by_id: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub updated_by_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ApiQueryParams {
    params: Vec<(String, String)>,
}

impl ApiQueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<K: Into<String>, V: ToString>(mut self, key: K, value: V) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    pub fn add_optional<K: Into<String>, V: ToString>(mut self, key: K, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.params.push((key.into(), v.to_string()));
        }
        self
    }

    pub fn to_query_string(&self) -> String {
        if self.params.is_empty() {
            String::new()
        } else {
            format!(
                "?{}",
                self.params
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
                    .collect::<Vec<_>>()
                    .join("&")
            )
        }
    }
}

/// Percent-encode one path segment
pub fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
