//! Nested-entity expansion: cards, advising relationships and positions.
//!
//! Each expander produces the statements for one embedded sub-record, scoped
//! to its own (derived) subject. Advisee records themselves are serialized by
//! the [`Serializer`](crate::Serializer); only the linking block is built here.

use crate::builder::build_field_update;
use crate::record::{Card, Fields, Position};
use crate::statement::{Triple, UpdateStatement};
use crate::term::{Literal, Term};
use crate::vocab::{self, ContextNamespaces};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Which card a [`card_statements`] call is writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Name,
    Address,
}

impl CardKind {
    fn link_predicate(self) -> &'static str {
        match self {
            CardKind::Name => vocab::VCARD_HAS_NAME,
            CardKind::Address => vocab::VCARD_HAS_ADDRESS,
        }
    }

    fn class(self) -> &'static str {
        match self {
            CardKind::Name => vocab::VCARD_NAME,
            CardKind::Address => vocab::VCARD_ADDRESS,
        }
    }

    pub fn subject(self, ns: &ContextNamespaces, owner_id: &str) -> String {
        match self {
            CardKind::Name => ns.name_card(owner_id),
            CardKind::Address => ns.address_card(owner_id),
        }
    }
}

/// Statements for a name or address card owned by `owner`.
///
/// A card is single-valued and wholly owned, so replacing it clears the link
/// and every triple on the card subject; its fields are then inserted without
/// per-field delete logic.
pub fn card_statements(
    ns: &ContextNamespaces,
    kind: CardKind,
    owner: &str,
    owner_id: &str,
    card: &Card,
    replace: bool,
    graph: &str,
) -> Vec<UpdateStatement> {
    let card_subject = kind.subject(ns, owner_id);
    let mut out = Vec::new();
    if replace {
        out.push(UpdateStatement::delete_predicate(
            graph,
            owner,
            kind.link_predicate(),
        ));
        out.push(UpdateStatement::clear_subject(graph, &card_subject));
    }

    let mut triples = vec![
        Triple::new(owner, kind.link_predicate(), Term::iri(&card_subject)),
        Triple::new(&card_subject, vocab::RDF_TYPE, Term::iri(kind.class())),
    ];
    triples.extend(field_triples(&card_subject, &card.fields));
    out.extend(UpdateStatement::insert(graph, triples));
    out
}

/// The insert-only block tying an advisor to one advisee.
///
/// Relationship and role subjects are derived from the two local ids, so
/// replaying the same pair writes the same triples again. Nothing here is
/// ever deleted.
pub fn relationship_block(
    ns: &ContextNamespaces,
    advisor: &str,
    advisor_id: &str,
    advisee: &str,
    advisee_id: &str,
    graph: &str,
    valid_on: NaiveDate,
) -> Option<UpdateStatement> {
    let relationship = ns.relationship(advisee_id, advisor_id);
    let advisor_role = ns.advisor_role(advisee_id, advisor_id);
    let advisee_role = ns.advisee_role(advisee_id, advisor_id);

    let triples = vec![
        Triple::new(
            &relationship,
            vocab::RDF_TYPE,
            Term::iri(vocab::VIVO_ADVISING_RELATIONSHIP),
        ),
        Triple::new(&advisor_role, vocab::RDF_TYPE, Term::iri(vocab::VIVO_ADVISOR_ROLE)),
        Triple::new(&advisee_role, vocab::RDF_TYPE, Term::iri(vocab::VIVO_ADVISEE_ROLE)),
        Triple::new(advisor, vocab::VIVO_RELATED_BY, Term::iri(&relationship)),
        Triple::new(advisee, vocab::VIVO_RELATED_BY, Term::iri(&relationship)),
        Triple::new(&relationship, vocab::DCTERMS_VALID, Literal::date(valid_on).into()),
        Triple::new(advisor, vocab::OBO_BEARER_OF, Term::iri(&advisor_role)),
        Triple::new(&advisor_role, vocab::OBO_INHERES_IN, Term::iri(advisor)),
        Triple::new(advisee, vocab::OBO_BEARER_OF, Term::iri(&advisee_role)),
        Triple::new(&advisee_role, vocab::OBO_INHERES_IN, Term::iri(advisee)),
    ];
    UpdateStatement::insert(graph, triples)
}

/// Statements for one position held by `holder`.
///
/// The linking block is insert-only; the label and the position's own fields
/// follow the usual per-field supersede rules.
pub fn position_statements(
    ns: &ContextNamespaces,
    holder: &str,
    holder_id: &str,
    position: &Position,
    graph: &str,
    valid_on: NaiveDate,
) -> Vec<UpdateStatement> {
    let subject = ns.position(&position.org_code, holder_id);
    let org = position.organization.as_str();

    let mut out = Vec::new();
    out.extend(UpdateStatement::insert(
        graph,
        vec![
            Triple::new(&subject, vocab::RDF_TYPE, Term::iri(vocab::VIVO_POSITION)),
            Triple::new(holder, vocab::VIVO_RELATED_BY, Term::iri(&subject)),
            Triple::new(&subject, vocab::VIVO_RELATES, Term::iri(holder)),
            Triple::new(org, vocab::VIVO_RELATED_BY, Term::iri(&subject)),
            Triple::new(&subject, vocab::VIVO_RELATES, Term::iri(org)),
            Triple::new(&subject, vocab::DCTERMS_VALID, Literal::date(valid_on).into()),
        ],
    ));
    out.extend(build_field_update(
        &subject,
        &[vocab::RDFS_LABEL],
        &position.labels,
        graph,
        position.supersede_label,
    ));
    out.extend(fields_update(&subject, &position.fields, &position.supersede, graph));
    out
}

/// The generic per-field pass: each predicate is replaced when flagged,
/// appended to otherwise.
pub fn fields_update(
    subject: &str,
    fields: &Fields,
    supersede: &BTreeSet<String>,
    graph: &str,
) -> Vec<UpdateStatement> {
    fields
        .iter()
        .flat_map(|(predicate, values)| {
            build_field_update(
                subject,
                &[predicate.as_str()],
                values,
                graph,
                supersede.contains(predicate),
            )
        })
        .collect()
}

fn field_triples<'a>(subject: &'a str, fields: &'a Fields) -> impl Iterator<Item = Triple> + 'a {
    fields.iter().flat_map(move |(predicate, values)| {
        values
            .iter()
            .map(move |v| Triple::new(subject, predicate.as_str(), v.clone()))
    })
}
