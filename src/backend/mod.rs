//! Backend health endpoint access.
//!
//! The status page depends on one backend route, `GET /api/hello`, which answers
//! with a JSON greeting. `BackendClient` is the seam the page talks to;
//! `HttpBackendClient` is the reqwest implementation used in production.
//!
//! Every way the call can go wrong collapses into one `BackendError`. The
//! variants exist only to produce a useful description for the page and logs.

mod client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use client::HttpBackendClient;

/// Greeting returned by the backend hello endpoint.
///
/// Only `message` is required. Any other fields are kept so the full payload
/// can be logged when the page settles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelloResponse {
    pub message: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl HelloResponse {
    /// Validate a response body against the greeting schema.
    pub fn from_slice(body: &[u8]) -> Result<Self, BackendError> {
        serde_json::from_slice(body).map_err(|e| BackendError::InvalidBody(e.to_string()))
    }

    /// Compact JSON rendering of the whole payload, for logs.
    pub fn payload(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}

/// Failure to obtain a well-formed greeting from the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// Connection refused, DNS failure, TLS handshake failure and the like
    #[error("Network error: {0}")]
    Unreachable(String),

    /// Request did not complete within the configured timeout
    #[error("timeout of {0}ms exceeded")]
    Timeout(u128),

    /// Backend answered with a non-2xx status
    #[error("Request failed with status code {}", .0.as_u16())]
    Status(http::StatusCode),

    /// Connection dropped or body could not be read
    #[error("Transport error: {0}")]
    Transport(String),

    /// Body is not JSON or lacks a string `message`
    #[error("Invalid response body: {0}")]
    InvalidBody(String),
}

/// Client capability for the backend hello endpoint.
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Issue one `GET /api/hello` and validate the response.
    async fn hello(&self) -> Result<HelloResponse, BackendError>;
}
