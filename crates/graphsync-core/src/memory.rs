//! In-memory quad set that applies [`UpdateStatement`]s.
//!
//! This is not a triple store. It implements exactly the two update forms the
//! serializer emits, which is enough to check what a sequence of statements
//! leaves behind (supersede, idempotence) and to dry-run a batch.

use crate::statement::UpdateStatement;
use crate::term::Term;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Quad {
    pub graph: String,
    pub subject: String,
    pub predicate: String,
    pub object: Term,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    quads: BTreeSet<Quad>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one statement; returns how many quads were added or removed.
    ///
    /// Deleting from a graph that holds nothing is a no-op.
    pub fn apply(&mut self, statement: &UpdateStatement) -> usize {
        match statement {
            UpdateStatement::Delete {
                graph,
                subject,
                predicate,
            } => {
                let before = self.quads.len();
                self.quads.retain(|q| {
                    !(q.graph == *graph
                        && q.subject == *subject
                        && predicate.as_ref().map_or(true, |p| q.predicate == *p))
                });
                before - self.quads.len()
            }
            UpdateStatement::Insert { graph, triples } => triples
                .iter()
                .filter(|t| {
                    self.quads.insert(Quad {
                        graph: graph.clone(),
                        subject: t.subject.clone(),
                        predicate: t.predicate.clone(),
                        object: t.object.clone(),
                    })
                })
                .count(),
        }
    }

    pub fn apply_all<'a>(&mut self, statements: impl IntoIterator<Item = &'a UpdateStatement>) {
        for statement in statements {
            self.apply(statement);
        }
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    pub fn quads(&self) -> impl Iterator<Item = &Quad> {
        self.quads.iter()
    }

    pub fn graphs(&self) -> BTreeSet<&str> {
        self.quads.iter().map(|q| q.graph.as_str()).collect()
    }

    /// Objects of `(subject, predicate)` in `graph`, in sorted order.
    pub fn objects(&self, graph: &str, subject: &str, predicate: &str) -> Vec<&Term> {
        self.quads
            .iter()
            .filter(|q| q.graph == graph && q.subject == subject && q.predicate == predicate)
            .map(|q| &q.object)
            .collect()
    }

    /// Whether anything in any graph is stated about `subject`.
    pub fn mentions_subject(&self, subject: &str) -> bool {
        self.quads.iter().any(|q| q.subject == subject)
    }
}
