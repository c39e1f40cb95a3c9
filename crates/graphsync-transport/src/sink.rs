//! Where a record's statements go.

use crate::client::SparqlUpdateClient;
use crate::error::TransportError;
use async_trait::async_trait;
use graphsync_core::{render_update, MemoryStore, UpdateStatement};
use std::sync::Mutex;

/// Receives one record's statements, in emission order.
#[async_trait]
pub trait UpdateSink: Send + Sync {
    async fn submit(&self, statements: &[UpdateStatement]) -> Result<(), TransportError>;
}

#[async_trait]
impl UpdateSink for SparqlUpdateClient {
    /// The whole sequence goes out as one `;`-separated update request.
    async fn submit(&self, statements: &[UpdateStatement]) -> Result<(), TransportError> {
        if statements.is_empty() {
            return Ok(());
        }
        self.execute(&render_update(statements)).await
    }
}

/// Applies statements to an in-memory quad set instead of a remote store.
#[derive(Debug, Default)]
pub struct MemorySink {
    store: Mutex<MemoryStore>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MemoryStore {
        match self.store.lock() {
            Ok(store) => store.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl UpdateSink for MemorySink {
    async fn submit(&self, statements: &[UpdateStatement]) -> Result<(), TransportError> {
        let mut store = self
            .store
            .lock()
            .map_err(|_| TransportError::Client("memory store lock poisoned".to_string()))?;
        store.apply_all(statements);
        Ok(())
    }
}
