/// Reasons an intermediate record cannot be turned into updates.
///
/// All of these are fatal for the record: nothing is emitted for it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IrError {
    #[error("record is missing required `@id`")]
    MissingId,
    #[error("record `{id}` has no named graph (no `@graph` and no enclosing graph)")]
    MissingGraph { id: String },
    #[error("record `{id}` contains an invalid IRI: {iri:?}")]
    InvalidIri { id: String, iri: String },
    #[error("record `{id}` nests `{key}` deeper than one level")]
    NestingTooDeep { id: String, key: &'static str },
    #[error("position under record `{id}` is missing `{key}`")]
    IncompletePosition { id: String, key: &'static str },
    #[error("record `{id}` has an invalid language tag: {tag:?}")]
    InvalidLanguageTag { id: String, tag: String },
}
