//! Vocabulary IRIs and the namespace layout for derived (structural) subjects.

use crate::term::iri_component;

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
pub const XSD_DATE: &str = "http://www.w3.org/2001/XMLSchema#date";

pub const DCTERMS_VALID: &str = "http://purl.org/dc/terms/valid";
pub const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";

pub const VCARD_FN: &str = "http://www.w3.org/2006/vcard/ns#fn";
pub const VCARD_HAS_NAME: &str = "http://www.w3.org/2006/vcard/ns#hasName";
pub const VCARD_HAS_ADDRESS: &str = "http://www.w3.org/2006/vcard/ns#hasAddress";
pub const VCARD_NAME: &str = "http://www.w3.org/2006/vcard/ns#Name";
pub const VCARD_ADDRESS: &str = "http://www.w3.org/2006/vcard/ns#Address";

pub const VIVO_ADVISING_RELATIONSHIP: &str = "http://vivoweb.org/ontology/core#AdvisingRelationship";
pub const VIVO_ADVISOR_ROLE: &str = "http://vivoweb.org/ontology/core#AdvisorRole";
pub const VIVO_ADVISEE_ROLE: &str = "http://vivoweb.org/ontology/core#AdviseeRole";
pub const VIVO_POSITION: &str = "http://vivoweb.org/ontology/core#Position";
pub const VIVO_RELATED_BY: &str = "http://vivoweb.org/ontology/core#relatedBy";
pub const VIVO_RELATES: &str = "http://vivoweb.org/ontology/core#relates";

/// "bearer of" (entity → role).
pub const OBO_BEARER_OF: &str = "http://purl.obolibrary.org/obo/RO_0000053";
/// "inheres in" (role → entity).
pub const OBO_INHERES_IN: &str = "http://purl.obolibrary.org/obo/RO_0000052";

/// Predicates a record's `@label` is written to.
pub const LABEL_PREDICATES: [&str; 2] = [SKOS_PREF_LABEL, VCARD_FN];

pub const DEFAULT_CONTEXT_BASE: &str = "urn:graphsync:context/";

/// Where structurally-identified subjects live.
///
/// Cards, relationships, roles and positions never carry an id of their own:
/// their IRIs are derived from the ids of the records they hang off, so the
/// same input always lands on the same subject.
///
/// Keys are the record's local `@id`, not its namespaced subject. Two records
/// sharing an `@id` under different `@id_ns` therefore share cards, roles,
/// relationships and positions; keep ids unique across namespaces or give
/// each namespace its own base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextNamespaces {
    base: String,
}

impl Default for ContextNamespaces {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_BASE)
    }
}

impl ContextNamespaces {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        if !base.ends_with(['/', '#', ':']) {
            base.push('/');
        }
        Self { base }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn derive(&self, collection: &str, key: &str) -> String {
        format!("{}{collection}/{}", self.base, iri_component(key))
    }

    pub fn name_card(&self, person_id: &str) -> String {
        self.derive("names", person_id)
    }

    pub fn address_card(&self, person_id: &str) -> String {
        self.derive("addresses", person_id)
    }

    pub fn relationship(&self, advisee_id: &str, advisor_id: &str) -> String {
        self.derive("relationships", &format!("{advisee_id}_{advisor_id}"))
    }

    pub fn advisor_role(&self, advisee_id: &str, advisor_id: &str) -> String {
        self.derive("roles", &format!("{advisee_id}_{advisor_id}_advisor"))
    }

    pub fn advisee_role(&self, advisee_id: &str, advisor_id: &str) -> String {
        self.derive("roles", &format!("{advisee_id}_{advisor_id}_advisee"))
    }

    pub fn position(&self, org_code: &str, person_id: &str) -> String {
        self.derive("positions", &format!("{org_code}_{person_id}"))
    }

    /// Placeholder organization for codes with no known mapping.
    pub fn unmapped_organization(&self) -> String {
        self.derive("organizations", "unmapped")
    }
}
