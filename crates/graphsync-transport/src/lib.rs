//! Getting statements into a triple store.
//!
//! - [`client`]: SPARQL 1.1 update over HTTP with retry/backoff
//! - [`config`]: endpoint URL, headers, timeouts (from the environment or flags)
//! - [`retry`]: exponential backoff with jitter; which statuses are transient
//! - [`sink`]: the [`UpdateSink`] seam (HTTP or in-memory)
//! - [`loader`]: NDJSON batch loading with per-record accounting

pub mod client;
pub mod config;
pub mod error;
pub mod loader;
pub mod retry;
pub mod sink;

pub use client::SparqlUpdateClient;
pub use config::{parse_header, ConfigError, TransportConfig};
pub use error::TransportError;
pub use loader::{BatchLoader, BatchReport, LoadError};
pub use retry::{is_retriable_status, RetryPolicy};
pub use sink::{MemorySink, UpdateSink};
