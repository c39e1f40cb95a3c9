use crate::retry::is_retriable_status;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("update endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: Box<TransportError>,
    },
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl TransportError {
    /// Connection failures and throttling/gateway statuses can be retried.
    pub fn is_retriable(&self) -> bool {
        match self {
            TransportError::Network(_) => true,
            TransportError::Status { status, .. } => is_retriable_status(*status),
            TransportError::Exhausted { .. } | TransportError::Client(_) => false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Exhausted { last, .. } => last.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_failures() {
        assert!(TransportError::Network("reset".into()).is_retriable());
        assert!(TransportError::Status { status: 503, body: String::new() }.is_retriable());
        assert!(!TransportError::Status { status: 400, body: String::new() }.is_retriable());

        let exhausted = TransportError::Exhausted {
            attempts: 7,
            last: Box::new(TransportError::Status { status: 502, body: String::new() }),
        };
        assert!(!exhausted.is_retriable());
        assert_eq!(exhausted.status(), Some(502));
    }
}
