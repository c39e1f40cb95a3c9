//! Typed update statements and their SPARQL 1.1 Update text.

use crate::term::Term;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>, object: Term) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        }
    }
}

/// One self-contained update against a single named graph.
///
/// Deletes and inserts are never combined: a `DELETE ... WHERE` only fires
/// when its pattern matches, so a combined statement would never perform the
/// first insert of a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatement {
    /// Remove every `(subject, predicate, ?o)` in `graph`; with no predicate,
    /// every triple about `subject`.
    Delete {
        graph: String,
        subject: String,
        predicate: Option<String>,
    },
    /// Add `triples` to `graph`. Never empty.
    Insert { graph: String, triples: Vec<Triple> },
}

impl UpdateStatement {
    pub fn delete_predicate(
        graph: impl Into<String>,
        subject: impl Into<String>,
        predicate: impl Into<String>,
    ) -> Self {
        UpdateStatement::Delete {
            graph: graph.into(),
            subject: subject.into(),
            predicate: Some(predicate.into()),
        }
    }

    pub fn clear_subject(graph: impl Into<String>, subject: impl Into<String>) -> Self {
        UpdateStatement::Delete {
            graph: graph.into(),
            subject: subject.into(),
            predicate: None,
        }
    }

    /// An insert of `triples`, or `None` when there is nothing to insert.
    /// Duplicate triples are dropped, keeping first-seen order.
    pub fn insert(graph: impl Into<String>, triples: Vec<Triple>) -> Option<Self> {
        let mut unique: Vec<Triple> = Vec::with_capacity(triples.len());
        for t in triples {
            if !unique.contains(&t) {
                unique.push(t);
            }
        }
        if unique.is_empty() {
            return None;
        }
        Some(UpdateStatement::Insert {
            graph: graph.into(),
            triples: unique,
        })
    }

    pub fn graph(&self) -> &str {
        match self {
            UpdateStatement::Delete { graph, .. } | UpdateStatement::Insert { graph, .. } => graph,
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, UpdateStatement::Delete { .. })
    }

    pub fn triples(&self) -> &[Triple] {
        match self {
            UpdateStatement::Insert { triples, .. } => triples,
            UpdateStatement::Delete { .. } => &[],
        }
    }
}

impl fmt::Display for UpdateStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateStatement::Delete {
                graph,
                subject,
                predicate,
            } => {
                let pattern = match predicate {
                    Some(p) => format!("<{subject}> <{p}> ?o ."),
                    None => format!("<{subject}> ?p ?o ."),
                };
                write!(
                    f,
                    "DELETE {{ GRAPH <{graph}> {{ {pattern} }} }} WHERE {{ GRAPH <{graph}> {{ {pattern} }} }}"
                )
            }
            UpdateStatement::Insert { graph, triples } => {
                writeln!(f, "INSERT DATA {{ GRAPH <{graph}> {{")?;
                for t in triples {
                    writeln!(f, "  <{}> <{}> {} .", t.subject, t.predicate, t.object)?;
                }
                write!(f, "}} }}")
            }
        }
    }
}

/// Join statements into one request body; every statement ends with `;`.
pub fn render_update(statements: &[UpdateStatement]) -> String {
    let mut out = String::new();
    for stmt in statements {
        out.push_str(&stmt.to_string());
        out.push_str(";\n");
    }
    out
}
