//! RDF object terms (IRIs and literals) and their SPARQL surface form.

use crate::vocab;
use chrono::NaiveDate;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sophia::api::term::LanguageTag;
use sophia::iri::IriRef;
use std::fmt;

/// Bytes left alone when an id becomes a path segment (RFC 3986 unreserved).
const ID_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    pub lexical: String,
    pub datatype: Option<String>,
    pub language: Option<String>,
}

impl Literal {
    /// Plain string literal (no datatype, no language tag).
    pub fn string(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
            language: None,
        }
    }

    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: Some(datatype.into()),
            language: None,
        }
    }

    pub fn lang(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
            language: Some(language.into()),
        }
    }

    pub fn boolean(value: bool) -> Self {
        Self::typed(value.to_string(), vocab::XSD_BOOLEAN)
    }

    pub fn integer(value: i64) -> Self {
        Self::typed(value.to_string(), vocab::XSD_INTEGER)
    }

    pub fn double(value: f64) -> Self {
        Self::typed(value.to_string(), vocab::XSD_DOUBLE)
    }

    pub fn date(value: NaiveDate) -> Self {
        Self::typed(value.format("%Y-%m-%d").to_string(), vocab::XSD_DATE)
    }
}

/// The object position of a triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Iri(String),
    Literal(Literal),
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    pub fn string(lexical: impl Into<String>) -> Self {
        Term::Literal(Literal::string(lexical))
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            Term::Literal(_) => None,
        }
    }
}

impl From<Literal> for Term {
    fn from(value: Literal) -> Self {
        Term::Literal(value)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::Literal(lit) => {
                write!(f, "\"{}\"", escape_literal(&lit.lexical))?;
                if let Some(lang) = &lit.language {
                    write!(f, "@{lang}")
                } else if let Some(dt) = &lit.datatype {
                    write!(f, "^^<{dt}>")
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Escape a lexical form for a double-quoted SPARQL string.
pub fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// Whether `iri` can be written inside `<...>` in a SPARQL update.
///
/// Any non-empty RFC 3987 IRI reference passes, relative ones included.
pub fn is_valid_iri(iri: &str) -> bool {
    !iri.is_empty() && IriRef::new(iri).is_ok()
}

/// Whether `tag` is a well-formed BCP 47 language tag.
pub fn is_valid_language_tag(tag: &str) -> bool {
    LanguageTag::new(tag).is_ok()
}

/// Percent-encode an identifier so it can be appended to a namespace IRI.
pub fn iri_component(s: &str) -> String {
    utf8_percent_encode(s, ID_COMPONENT).to_string()
}
