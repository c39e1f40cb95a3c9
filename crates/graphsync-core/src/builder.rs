//! Per-predicate statement construction.

use crate::statement::{Triple, UpdateStatement};
use crate::term::Term;

/// Statements that (optionally) clear and then set `predicates` on `subject`.
///
/// `predicates` are synonyms: every value is written under each of them.
/// With `delete_first`, one delete per predicate comes first (one unbound
/// pattern per statement). The insert is a single statement holding the
/// `predicates × values` cross product, and is omitted when `values` is
/// empty, which turns a flagged field with no values into a plain clear.
pub fn build_field_update(
    subject: &str,
    predicates: &[&str],
    values: &[Term],
    graph: &str,
    delete_first: bool,
) -> Vec<UpdateStatement> {
    let mut out = Vec::new();
    if delete_first {
        for predicate in predicates {
            out.push(UpdateStatement::delete_predicate(graph, subject, *predicate));
        }
    }

    let triples = predicates
        .iter()
        .flat_map(|p| values.iter().map(move |v| Triple::new(subject, *p, v.clone())))
        .collect();
    out.extend(UpdateStatement::insert(graph, triples));
    out
}

/// Convenience for IRI-valued objects (`rdf:type` and friends).
pub fn iri_values<S: AsRef<str>>(iris: &[S]) -> Vec<Term> {
    iris.iter().map(|s| Term::iri(s.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Literal;

    #[test]
    fn insert_only_without_flag() {
        let out = build_field_update("s", &["p"], &[Term::string("v")], "g", false);
        assert_eq!(out.len(), 1);
        assert!(!out[0].is_delete());
    }

    #[test]
    fn one_delete_per_predicate_then_cross_product_insert() {
        let values = [Term::string("a"), Term::string("b")];
        let out = build_field_update("s", &["p1", "p2"], &values, "g", true);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], UpdateStatement::delete_predicate("g", "s", "p1"));
        assert_eq!(out[1], UpdateStatement::delete_predicate("g", "s", "p2"));
        assert_eq!(out[2].triples().len(), 4);
    }

    #[test]
    fn empty_values_clear_without_insert() {
        let out = build_field_update("s", &["p"], &[], "g", true);
        assert_eq!(out, vec![UpdateStatement::delete_predicate("g", "s", "p")]);
        assert!(build_field_update("s", &["p"], &[], "g", false).is_empty());
    }

    #[test]
    fn falsy_values_are_still_values() {
        let values = [
            Term::from(Literal::boolean(false)),
            Term::from(Literal::integer(0)),
            Term::string(""),
        ];
        let out = build_field_update("s", &["p"], &values, "g", false);
        assert_eq!(out[0].triples().len(), 3);
    }
}
