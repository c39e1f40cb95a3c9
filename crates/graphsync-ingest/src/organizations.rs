//! Organization code → organization IRI.
//!
//! Reference data is never allowed to block a record: an unknown code
//! resolves to a placeholder organization and a warning is logged.

use crate::decode::DecodeError;
use graphsync_core::ContextNamespaces;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct OrganizationMap {
    codes: HashMap<String, String>,
    placeholder: String,
}

impl Default for OrganizationMap {
    fn default() -> Self {
        Self::new(ContextNamespaces::default().unmapped_organization())
    }
}

impl OrganizationMap {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            codes: HashMap::new(),
            placeholder: placeholder.into(),
        }
    }

    pub fn insert(&mut self, code: impl Into<String>, iri: impl Into<String>) {
        self.codes.insert(code.into(), iri.into());
    }

    /// Parse a JSON object of `"CODE": "iri"` entries.
    pub fn from_json(value: &Value, placeholder: impl Into<String>) -> Result<Self, DecodeError> {
        let obj = value.as_object().ok_or(DecodeError::NotAnObject {
            context: "organization map",
        })?;
        let mut map = Self::new(placeholder);
        for (code, iri) in obj {
            let iri = iri.as_str().ok_or_else(|| DecodeError::InvalidValue {
                key: code.clone(),
                reason: "organization IRI must be a string".to_string(),
            })?;
            map.insert(code.clone(), iri);
        }
        Ok(map)
    }

    pub fn from_path(path: &Path, placeholder: impl Into<String>) -> Result<Self, DecodeError> {
        let text = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&text).map_err(|e| DecodeError::InvalidValue {
            key: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&value, placeholder)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn lookup(&self, code: &str) -> Option<&str> {
        self.codes.get(code).map(String::as_str)
    }

    /// The IRI for `code`, or the placeholder (with a warning) when unmapped.
    pub fn resolve(&self, code: &str) -> &str {
        match self.lookup(code) {
            Some(iri) => iri,
            None => {
                tracing::warn!(
                    org_code = code,
                    placeholder = %self.placeholder,
                    "unmapped organization"
                );
                &self.placeholder
            }
        }
    }
}
