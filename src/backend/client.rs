//! reqwest implementation of the backend client.

use std::error::Error as StdError;
use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;

use crate::config::{BackendConfig, ConfigError};

use super::{BackendClient, BackendError, HelloResponse};

/// Backend client issuing plain `GET` requests to the hello endpoint.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct HttpBackendClient {
    http: reqwest::Client,
    hello_url: reqwest::Url,
    request_timeout: Duration,
    connect_timeout: Duration,
}

impl HttpBackendClient {
    /// Build a client from the `[backend]` configuration section.
    pub fn from_config(config: &BackendConfig) -> Result<Self, ConfigError> {
        let hello_url = config.hello_url()?;
        Self::new(hello_url, config.request_timeout(), config.connect_timeout())
    }

    /// Build a client for an explicit URL and timeouts.
    pub fn new(
        hello_url: reqwest::Url,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| ConfigError::Validation(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            hello_url,
            request_timeout,
            connect_timeout,
        })
    }

    pub fn hello_url(&self) -> &reqwest::Url {
        &self.hello_url
    }

    /// Map a reqwest failure onto the single backend failure kind.
    fn classify(&self, err: reqwest::Error) -> BackendError {
        // A connect timeout reports both flags
        match (err.is_connect(), err.is_timeout()) {
            (true, true) => BackendError::Timeout(self.connect_timeout.as_millis()),
            (true, false) => BackendError::Unreachable(describe(&err)),
            (false, true) => BackendError::Timeout(self.request_timeout.as_millis()),
            (false, false) => BackendError::Transport(describe(&err)),
        }
    }
}

/// Flatten an error and its sources into one line, e.g.
/// "error sending request for url (...): client error (Connect): Connection refused".
fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !parts.iter().any(|p| p.contains(&text)) {
            parts.push(text);
        }
        source = cause.source();
    }
    parts.join(": ")
}

#[async_trait]
impl BackendClient for HttpBackendClient {
    #[instrument(name = "backend::hello", skip(self), fields(url = %self.hello_url))]
    async fn hello(&self) -> Result<HelloResponse, BackendError> {
        let response = self
            .http
            .get(self.hello_url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "Backend returned non-success status");
            return Err(BackendError::Status(status));
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        tracing::debug!(status = status.as_u16(), bytes = body.len(), "Backend responded");

        HelloResponse::from_slice(&body)
    }
}
