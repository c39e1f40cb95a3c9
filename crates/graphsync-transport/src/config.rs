//! Update endpoint configuration.
//!
//! Environment variables:
//!
//! - `GRAPHSYNC_UPDATE_URL` (required): SPARQL 1.1 update endpoint
//! - `GRAPHSYNC_MAX_RETRIES`: retries after the first attempt (default 6)
//! - `GRAPHSYNC_TIMEOUT_SECS`: per-request timeout (default 500)

use crate::retry::RetryPolicy;
use reqwest::header::{HeaderName, HeaderValue};
use std::time::Duration;
use url::Url;

pub const ENV_UPDATE_URL: &str = "GRAPHSYNC_UPDATE_URL";
pub const ENV_MAX_RETRIES: &str = "GRAPHSYNC_MAX_RETRIES";
pub const ENV_TIMEOUT_SECS: &str = "GRAPHSYNC_TIMEOUT_SECS";

#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub update_url: Url,
    pub headers: Vec<(String, String)>,
    pub retry: RetryPolicy,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("invalid update URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("invalid header `{0}`; expected `Name: value`")]
    InvalidHeader(String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl TransportConfig {
    pub fn new(update_url: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(update_url).map_err(|e| ConfigError::InvalidUrl {
            url: update_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: update_url.to_string(),
                reason: "scheme must be http or https".to_string(),
            });
        }
        Ok(Self {
            update_url: parsed,
            headers: Vec::new(),
            retry: RetryPolicy::default(),
            timeout: Duration::from_secs(500),
            connect_timeout: Duration::from_secs(10),
        })
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = lookup(ENV_UPDATE_URL).ok_or(ConfigError::Missing(ENV_UPDATE_URL))?;
        let mut config = Self::new(&url)?;
        if let Some(raw) = lookup(ENV_MAX_RETRIES) {
            let retries = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("{ENV_MAX_RETRIES}={raw}")))?;
            config.retry.max_retries = retries;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("{ENV_TIMEOUT_SECS}={raw}")))?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.retry.max_retries = max_retries;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Parse a `Name: value` header argument.
pub fn parse_header(raw: &str) -> Result<(String, String), ConfigError> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| ConfigError::InvalidHeader(raw.to_string()))?;
    let (name, value) = (name.trim(), value.trim());
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| ConfigError::InvalidHeader(raw.to_string()))?;
    HeaderValue::from_str(value).map_err(|_| ConfigError::InvalidHeader(raw.to_string()))?;
    Ok((name.to_string(), value.to_string()))
}
