//! Record → ordered update statements.

use crate::builder::{build_field_update, iri_values};
use crate::error::IrError;
use crate::expand::{self, CardKind};
use crate::record::Record;
use crate::statement::{render_update, UpdateStatement};
use crate::term::{Literal, Term};
use crate::vocab::{self, ContextNamespaces};
use chrono::{NaiveDate, Utc};

/// Turns IR records into update statements.
///
/// Emission order for one record is fixed:
///
/// 1. validity date (always deleted and re-inserted)
/// 2. `rdf:type` (deleted first only with `!type`)
/// 3. label under both label predicates (deleted first only with `!label`)
/// 4. name card, 5. address card
/// 6. advisees: each advisee record, then its relationship block
/// 7. positions
/// 8. remaining data fields, each honoring its own `!` flag
///
/// Date and type come first so a batch that fails part-way still leaves the
/// record marked as seen and correctly typed.
///
/// A `Serializer` holds only configuration; it is `Send + Sync` and can be
/// shared across threads.
#[derive(Debug, Clone)]
pub struct Serializer {
    namespaces: ContextNamespaces,
    valid_on: NaiveDate,
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new(ContextNamespaces::default())
    }
}

impl Serializer {
    /// A serializer stamping records with today's (UTC) date.
    pub fn new(namespaces: ContextNamespaces) -> Self {
        Self {
            namespaces,
            valid_on: Utc::now().date_naive(),
        }
    }

    pub fn with_valid_on(mut self, valid_on: NaiveDate) -> Self {
        self.valid_on = valid_on;
        self
    }

    pub fn namespaces(&self) -> &ContextNamespaces {
        &self.namespaces
    }

    pub fn valid_on(&self) -> NaiveDate {
        self.valid_on
    }

    /// Statements for a top-level record.
    ///
    /// The whole record tree is validated before anything is built, so an
    /// invalid record yields an error and no statements at all.
    pub fn serialize(&self, record: &Record) -> Result<Vec<UpdateStatement>, IrError> {
        record.validate()?;
        let mut out = Vec::new();
        self.emit_record(record, None, &mut out)?;
        tracing::debug!(
            subject = %record.subject(),
            statements = out.len(),
            "serialized record"
        );
        Ok(out)
    }

    /// [`serialize`](Self::serialize) rendered as one `;`-terminated update body.
    pub fn serialize_to_string(&self, record: &Record) -> Result<String, IrError> {
        Ok(render_update(&self.serialize(record)?))
    }

    fn emit_record(
        &self,
        record: &Record,
        inherited_graph: Option<&str>,
        out: &mut Vec<UpdateStatement>,
    ) -> Result<(), IrError> {
        let graph = record
            .effective_graph(inherited_graph)
            .ok_or_else(|| IrError::MissingGraph {
                id: record.id.clone(),
            })?;
        let subject = record.subject();
        let id = record.id.as_str();

        out.extend(build_field_update(
            &subject,
            &[vocab::DCTERMS_VALID],
            &[Term::from(Literal::date(self.valid_on))],
            graph,
            true,
        ));

        out.extend(build_field_update(
            &subject,
            &[vocab::RDF_TYPE],
            &iri_values(&record.types),
            graph,
            record.supersede.types,
        ));

        out.extend(build_field_update(
            &subject,
            &vocab::LABEL_PREDICATES,
            &record.labels,
            graph,
            record.supersede.label,
        ));

        if let Some(card) = &record.person_name {
            out.extend(expand::card_statements(
                &self.namespaces,
                CardKind::Name,
                &subject,
                id,
                card,
                record.supersede.person_name,
                graph,
            ));
        }

        if let Some(card) = &record.person_address {
            out.extend(expand::card_statements(
                &self.namespaces,
                CardKind::Address,
                &subject,
                id,
                card,
                record.supersede.person_address,
                graph,
            ));
        }

        for advisee in &record.advisees {
            self.emit_record(advisee, Some(graph), out)?;
            out.extend(expand::relationship_block(
                &self.namespaces,
                &subject,
                id,
                &advisee.subject(),
                &advisee.id,
                graph,
                self.valid_on,
            ));
        }

        for position in &record.positions {
            let position_graph = position.graph.as_deref().unwrap_or(graph);
            out.extend(expand::position_statements(
                &self.namespaces,
                &subject,
                id,
                position,
                position_graph,
                self.valid_on,
            ));
        }

        out.extend(expand::fields_update(
            &subject,
            &record.fields,
            &record.supersede.fields,
            graph,
        ));
        Ok(())
    }
}
