//! The intermediate record (IR).
//!
//! An IR record is what a transformer hands to the serializer. On the wire it
//! is a JSON object with three kinds of keys:
//!
//! - control keys (`@id`, `@id_ns`, `@graph`, `@type`, `@label`, and the
//!   embedding keys `@person_name`, `@person_address`, `@advisees`,
//!   `@positions`),
//! - versioning flags (`!type`, `!label`, `!person_name`, `!<predicate>`, ...),
//! - data fields: every other key is a predicate IRI.
//!
//! Here each control key is a typed field and the free-form data fields live
//! in an ordered predicate → values map. Nesting is one level deep at most:
//! advisees and positions may not embed further advisees or positions.

use crate::error::IrError;
use crate::term::{is_valid_iri, is_valid_language_tag, Term};
use std::collections::{BTreeMap, BTreeSet};

/// Predicate IRI → object values. An empty value list is meaningful: with a
/// matching supersede flag it clears the predicate without inserting.
pub type Fields = BTreeMap<String, Vec<Term>>;

/// Which aspects of a record replace (rather than add to) what the store holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Supersede {
    /// `!type`
    pub types: bool,
    /// `!label`
    pub label: bool,
    /// `!person_name`
    pub person_name: bool,
    /// `!person_address`
    pub person_address: bool,
    /// `!<predicate>` for data fields.
    pub fields: BTreeSet<String>,
}

/// A name or address card. Its subject is derived from the owning record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Card {
    pub fields: Fields,
}

impl Card {
    pub fn with_field(mut self, predicate: impl Into<String>, value: Term) -> Self {
        self.fields.entry(predicate.into()).or_default().push(value);
        self
    }
}

/// A position held by the record's subject in an organization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Position {
    pub org_code: String,
    pub organization: String,
    pub graph: Option<String>,
    pub labels: Vec<Term>,
    pub supersede_label: bool,
    pub supersede: BTreeSet<String>,
    pub fields: Fields,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub id_ns: Option<String>,
    pub graph: Option<String>,
    pub types: Vec<String>,
    pub labels: Vec<Term>,
    pub person_name: Option<Card>,
    pub person_address: Option<Card>,
    pub advisees: Vec<Record>,
    pub positions: Vec<Position>,
    pub supersede: Supersede,
    pub fields: Fields,
}

impl Record {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_namespace(mut self, id_ns: impl Into<String>) -> Self {
        self.id_ns = Some(id_ns.into());
        self
    }

    pub fn in_graph(mut self, graph: impl Into<String>) -> Self {
        self.graph = Some(graph.into());
        self
    }

    pub fn with_type(mut self, class: impl Into<String>) -> Self {
        self.types.push(class.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(Term::string(label));
        self
    }

    pub fn with_field(mut self, predicate: impl Into<String>, value: Term) -> Self {
        self.fields.entry(predicate.into()).or_default().push(value);
        self
    }

    /// Mark a data field as superseding whatever the store already holds.
    pub fn superseding(mut self, predicate: impl Into<String>) -> Self {
        self.supersede.fields.insert(predicate.into());
        self
    }

    /// Subject IRI: `@id_ns + @id`, or `@id` alone when it is already absolute.
    pub fn subject(&self) -> String {
        match &self.id_ns {
            Some(ns) => format!("{ns}{}", self.id),
            None => self.id.clone(),
        }
    }

    /// The record's own graph, falling back to the enclosing one.
    pub fn effective_graph<'a>(&'a self, inherited: Option<&'a str>) -> Option<&'a str> {
        self.graph.as_deref().or(inherited)
    }

    /// Check a top-level record (and everything nested in it).
    pub fn validate(&self) -> Result<(), IrError> {
        self.validate_at(None, 0)
    }

    fn validate_at(&self, inherited: Option<&str>, depth: usize) -> Result<(), IrError> {
        if self.id.trim().is_empty() {
            return Err(IrError::MissingId);
        }
        let graph = self
            .effective_graph(inherited)
            .ok_or_else(|| IrError::MissingGraph {
                id: self.id.clone(),
            })?;

        let check = |iri: &str| -> Result<(), IrError> {
            if is_valid_iri(iri) {
                Ok(())
            } else {
                Err(IrError::InvalidIri {
                    id: self.id.clone(),
                    iri: iri.to_string(),
                })
            }
        };

        check(&self.subject())?;
        check(graph)?;
        for class in &self.types {
            check(class)?;
        }
        check_terms(&self.id, &self.labels, &check)?;
        check_fields(&self.id, &self.fields, &check)?;
        for card in [&self.person_name, &self.person_address].into_iter().flatten() {
            check_fields(&self.id, &card.fields, &check)?;
        }

        if depth > 0 {
            if !self.advisees.is_empty() {
                return Err(IrError::NestingTooDeep {
                    id: self.id.clone(),
                    key: "@advisees",
                });
            }
            if !self.positions.is_empty() {
                return Err(IrError::NestingTooDeep {
                    id: self.id.clone(),
                    key: "@positions",
                });
            }
        }

        for advisee in &self.advisees {
            advisee.validate_at(Some(graph), depth + 1)?;
        }

        for position in &self.positions {
            if position.org_code.trim().is_empty() {
                return Err(IrError::IncompletePosition {
                    id: self.id.clone(),
                    key: "@org_code",
                });
            }
            if position.organization.is_empty() {
                return Err(IrError::IncompletePosition {
                    id: self.id.clone(),
                    key: "@organization",
                });
            }
            check(&position.organization)?;
            if let Some(g) = &position.graph {
                check(g)?;
            }
            check_terms(&self.id, &position.labels, &check)?;
            check_fields(&self.id, &position.fields, &check)?;
        }

        Ok(())
    }
}

/// IRIs, literal datatypes and language tags all end up verbatim in update
/// text, so every one of them is checked.
fn check_terms(
    id: &str,
    terms: &[Term],
    check: &impl Fn(&str) -> Result<(), IrError>,
) -> Result<(), IrError> {
    for term in terms {
        match term {
            Term::Iri(iri) => check(iri)?,
            Term::Literal(lit) => {
                if let Some(datatype) = &lit.datatype {
                    check(datatype)?;
                }
                if let Some(tag) = &lit.language {
                    if !is_valid_language_tag(tag) {
                        return Err(IrError::InvalidLanguageTag {
                            id: id.to_string(),
                            tag: tag.clone(),
                        });
                    }
                }
            }
        }
    }
    Ok(())
}

fn check_fields(
    id: &str,
    fields: &Fields,
    check: &impl Fn(&str) -> Result<(), IrError>,
) -> Result<(), IrError> {
    for (predicate, values) in fields {
        check(predicate)?;
        check_terms(id, values, check)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Literal;

    #[test]
    fn subject_prepends_namespace() {
        let r = Record::new("1234").with_namespace("http://x.org/people/");
        assert_eq!(r.subject(), "http://x.org/people/1234");
        assert_eq!(Record::new("http://x.org/p/9").subject(), "http://x.org/p/9");
    }

    #[test]
    fn missing_id_and_graph_are_rejected() {
        assert_eq!(Record::new("").in_graph("g").validate(), Err(IrError::MissingId));
        assert_eq!(
            Record::new("1").validate(),
            Err(IrError::MissingGraph { id: "1".into() })
        );
    }

    #[test]
    fn advisees_inherit_the_parent_graph() {
        let mut parent = Record::new("1").in_graph("g");
        parent.advisees.push(Record::new("2"));
        assert!(parent.validate().is_ok());
    }

    #[test]
    fn advisees_may_not_nest_further() {
        let mut advisee = Record::new("2");
        advisee.advisees.push(Record::new("3"));
        let mut parent = Record::new("1").in_graph("g");
        parent.advisees.push(advisee);
        assert_eq!(
            parent.validate(),
            Err(IrError::NestingTooDeep {
                id: "2".into(),
                key: "@advisees"
            })
        );
    }

    #[test]
    fn invalid_predicate_is_reported() {
        let r = Record::new("1")
            .in_graph("g")
            .with_field("http://x.org/has space", Term::string("v"));
        assert!(matches!(r.validate(), Err(IrError::InvalidIri { .. })));
    }

    #[test]
    fn literal_datatypes_must_be_iris() {
        let r = Record::new("1").in_graph("g").with_field(
            "http://x.org/p",
            Literal::typed("v", "http://x.org/dt> . } }; DROP ALL ; #").into(),
        );
        assert!(matches!(r.validate(), Err(IrError::InvalidIri { .. })));
    }

    #[test]
    fn language_tags_are_checked_everywhere_they_appear() {
        let bad = Term::from(Literal::lang("v", "en . } }; DROP ALL ; #"));

        let field = Record::new("1")
            .in_graph("g")
            .with_field("http://x.org/p", bad.clone());
        assert_eq!(
            field.validate(),
            Err(IrError::InvalidLanguageTag {
                id: "1".into(),
                tag: "en . } }; DROP ALL ; #".into(),
            })
        );

        let mut label = Record::new("1").in_graph("g");
        label.labels.push(bad.clone());
        assert!(matches!(label.validate(), Err(IrError::InvalidLanguageTag { .. })));

        let mut card = Record::new("1").in_graph("g");
        card.person_name = Some(Card::default().with_field("http://x.org/given", bad));
        assert!(matches!(card.validate(), Err(IrError::InvalidLanguageTag { .. })));

        let ok = Record::new("1")
            .in_graph("g")
            .with_field("http://x.org/p", Literal::lang("Jeanne", "fr-CA").into());
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn positions_need_code_and_organization() {
        let mut r = Record::new("1").in_graph("g");
        r.positions.push(Position {
            org_code: "MED".into(),
            ..Position::default()
        });
        assert_eq!(
            r.validate(),
            Err(IrError::IncompletePosition {
                id: "1".into(),
                key: "@organization"
            })
        );
    }
}
