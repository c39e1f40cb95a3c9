//! JSON → [`Record`].
//!
//! Object values follow JSON-LD conventions:
//!
//! - `"text"` → plain literal; `true`/`false` → `xsd:boolean`;
//!   integers → `xsd:integer`; other numbers → `xsd:double`
//! - `{"@id": "..."}` → IRI
//! - `{"@value": "...", "@type": "dt"}` / `{"@value": "...", "@language": "en"}`
//! - arrays → several values; `null` → no value
//!
//! `@type` entries and `@organization` are always IRIs. A `!key` flag is set
//! unless its value is `false` or `null`. Unknown `@` keys are ignored.
//!
//! Decoding checks shape only; identity and graph rules are enforced when the
//! record is serialized.

use crate::organizations::OrganizationMap;
use graphsync_core::{Card, Fields, Literal, Position, Record, Term};
use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("{context} must be a JSON object")]
    NotAnObject { context: &'static str },
    #[error("invalid value for `{key}`: {reason}")]
    InvalidValue { key: String, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn invalid(key: &str, reason: impl Into<String>) -> DecodeError {
    DecodeError::InvalidValue {
        key: key.to_string(),
        reason: reason.into(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordDecoder {
    organizations: OrganizationMap,
}

impl RecordDecoder {
    pub fn new(organizations: OrganizationMap) -> Self {
        Self { organizations }
    }

    pub fn organizations(&self) -> &OrganizationMap {
        &self.organizations
    }

    pub fn decode_record(&self, value: &Value) -> Result<Record, DecodeError> {
        let obj = value
            .as_object()
            .ok_or(DecodeError::NotAnObject { context: "record" })?;

        let mut record = Record::default();
        for (key, v) in obj {
            match key.as_str() {
                "@id" => record.id = scalar_string(key, v)?.unwrap_or_default(),
                "@id_ns" => record.id_ns = scalar_string(key, v)?,
                "@graph" => record.graph = scalar_string(key, v)?,
                "@type" => record.types = iris(key, v)?,
                "@label" => record.labels = terms(key, v)?,
                "@person_name" => record.person_name = card(key, v)?,
                "@person_address" => record.person_address = card(key, v)?,
                "@advisees" => {
                    record.advisees = objects(key, v)?
                        .into_iter()
                        .map(|a| self.decode_record(a))
                        .collect::<Result<_, _>>()?
                }
                "@positions" => {
                    record.positions = objects(key, v)?
                        .into_iter()
                        .map(|p| self.position(p))
                        .collect::<Result<_, _>>()?
                }
                k if k.starts_with('@') => {
                    tracing::debug!(key = k, "ignoring unknown control key");
                }
                k => match k.strip_prefix('!') {
                    Some(flag) => {
                        if is_set(v) {
                            match flag {
                                "type" => record.supersede.types = true,
                                "label" => record.supersede.label = true,
                                "person_name" => record.supersede.person_name = true,
                                "person_address" => record.supersede.person_address = true,
                                predicate => {
                                    record.supersede.fields.insert(predicate.to_string());
                                }
                            }
                        }
                    }
                    None => {
                        record.fields.insert(k.to_string(), terms(k, v)?);
                    }
                },
            }
        }
        Ok(record)
    }

    fn position(&self, value: &Value) -> Result<Position, DecodeError> {
        let obj = value
            .as_object()
            .ok_or(DecodeError::NotAnObject { context: "position" })?;

        let mut position = Position::default();
        let mut organization = None;
        for (key, v) in obj {
            match key.as_str() {
                "@org_code" => position.org_code = scalar_string(key, v)?.unwrap_or_default(),
                "@organization" => organization = iris(key, v)?.into_iter().next(),
                "@graph" => position.graph = scalar_string(key, v)?,
                "@label" => position.labels = terms(key, v)?,
                "!label" => position.supersede_label = is_set(v),
                k if k.starts_with('@') => {
                    tracing::debug!(key = k, "ignoring unknown position key");
                }
                k => match k.strip_prefix('!') {
                    Some(predicate) => {
                        if is_set(v) {
                            position.supersede.insert(predicate.to_string());
                        }
                    }
                    None => {
                        position.fields.insert(k.to_string(), terms(k, v)?);
                    }
                },
            }
        }

        position.organization = match organization {
            Some(iri) => iri,
            None if position.org_code.is_empty() => String::new(),
            None => self.organizations.resolve(&position.org_code).to_string(),
        };
        Ok(position)
    }
}

fn is_set(v: &Value) -> bool {
    !matches!(v, Value::Null | Value::Bool(false))
}

fn scalar_string(key: &str, v: &Value) -> Result<Option<String>, DecodeError> {
    match v {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        _ => Err(invalid(key, "expected a string")),
    }
}

fn iris(key: &str, v: &Value) -> Result<Vec<String>, DecodeError> {
    match v {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Object(obj) => match obj.get("@id") {
            Some(Value::String(s)) => Ok(vec![s.clone()]),
            _ => Err(invalid(key, "expected an IRI string or {\"@id\": ...}")),
        },
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                if item.is_array() {
                    return Err(invalid(key, "nested arrays are not allowed"));
                }
                out.extend(iris(key, item)?);
            }
            Ok(out)
        }
        _ => Err(invalid(key, "expected an IRI")),
    }
}

fn terms(key: &str, v: &Value) -> Result<Vec<Term>, DecodeError> {
    match v {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                if item.is_array() {
                    return Err(invalid(key, "nested arrays are not allowed"));
                }
                out.extend(terms(key, item)?);
            }
            Ok(out)
        }
        Value::String(s) => Ok(vec![Term::string(s.as_str())]),
        Value::Bool(b) => Ok(vec![Literal::boolean(*b).into()]),
        Value::Number(n) => {
            let lit = if let Some(i) = n.as_i64() {
                Literal::integer(i)
            } else if n.is_u64() {
                Literal::typed(n.to_string(), graphsync_core::vocab::XSD_INTEGER)
            } else if let Some(f) = n.as_f64() {
                Literal::double(f)
            } else {
                Literal::typed(n.to_string(), graphsync_core::vocab::XSD_DOUBLE)
            };
            Ok(vec![lit.into()])
        }
        Value::Object(obj) => Ok(vec![object_term(key, obj)?]),
    }
}

fn object_term(key: &str, obj: &Map<String, Value>) -> Result<Term, DecodeError> {
    if let Some(id) = obj.get("@id") {
        return match id {
            Value::String(s) => Ok(Term::iri(s.as_str())),
            _ => Err(invalid(key, "`@id` must be a string")),
        };
    }
    let Some(value) = obj.get("@value") else {
        return Err(invalid(key, "objects must carry `@id` or `@value`"));
    };
    let lexical = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return Err(invalid(key, "`@value` must be a scalar")),
    };
    let lit = match (obj.get("@type"), obj.get("@language")) {
        (Some(Value::String(dt)), None) => Literal::typed(lexical, dt.as_str()),
        (None, Some(Value::String(lang))) => Literal::lang(lexical, lang.as_str()),
        (None, None) => Literal::string(lexical),
        _ => return Err(invalid(key, "use either `@type` or `@language` (as strings)")),
    };
    Ok(lit.into())
}

fn objects<'a>(key: &str, v: &'a Value) -> Result<Vec<&'a Value>, DecodeError> {
    match v {
        Value::Null => Ok(Vec::new()),
        Value::Object(_) => Ok(vec![v]),
        Value::Array(items) => {
            if let Some(bad) = items.iter().find(|i| !i.is_object()) {
                return Err(invalid(key, format!("expected objects, found {bad}")));
            }
            Ok(items.iter().collect())
        }
        _ => Err(invalid(key, "expected an object or an array of objects")),
    }
}

/// A card is an object, or an array whose first object is used.
fn card(key: &str, v: &Value) -> Result<Option<Card>, DecodeError> {
    let Some(obj) = objects(key, v)?.into_iter().next() else {
        return Ok(None);
    };
    let mut fields = Fields::new();
    for (k, value) in obj.as_object().into_iter().flatten() {
        if k.starts_with(['@', '!']) {
            continue;
        }
        fields.insert(k.clone(), terms(k, value)?);
    }
    Ok(Some(Card { fields }))
}
