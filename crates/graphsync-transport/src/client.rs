//! SPARQL 1.1 update over HTTP.
//!
//! Bodies are POSTed as `application/sparql-update`. TLS certificates are
//! always verified. Retriable failures are retried per the configured
//! [`RetryPolicy`](crate::retry::RetryPolicy); anything else is returned on
//! the first occurrence.

use crate::config::TransportConfig;
use crate::error::TransportError;
use reqwest::Client;

pub const SPARQL_UPDATE_CONTENT_TYPE: &str = "application/sparql-update";

// ============================================================================
// Client
// ============================================================================

pub struct SparqlUpdateClient {
    client: Client,
    config: TransportConfig,
}

impl SparqlUpdateClient {
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Submit one update body, retrying transient failures.
    pub async fn execute(&self, body: &str) -> Result<(), TransportError> {
        let policy = &self.config.retry;
        let attempts = policy.max_attempts();
        let mut attempt = 0;
        loop {
            attempt += 1;
            let err = match self.post_once(body).await {
                Ok(()) => return Ok(()),
                Err(e) => e,
            };
            if !err.is_retriable() {
                return Err(err);
            }
            if attempt >= attempts {
                return Err(TransportError::Exhausted {
                    attempts,
                    last: Box::new(err),
                });
            }
            let delay = policy.delay_for_attempt(attempt - 1);
            tracing::warn!(
                url = %self.config.update_url,
                error = %err,
                remaining = attempts - attempt,
                delay_ms = delay.as_millis() as u64,
                "update failed; retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn post_once(&self, body: &str) -> Result<(), TransportError> {
        let mut request = self
            .client
            .post(self.config.update_url.clone())
            .header(reqwest::header::CONTENT_TYPE, SPARQL_UPDATE_CONTENT_TYPE);
        for (name, value) in &self.config.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(TransportError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
