//! Input/output adapters around the synthesis engine.
//!
//! - [`ndjson`]: one JSON object per line; malformed lines are logged and skipped
//! - [`decode`]: JSON objects → typed intermediate records
//! - [`organizations`]: organization code → IRI, with a placeholder fallback
//! - [`jsonld`]: accumulate records, write one JSON document on close

pub mod decode;
pub mod jsonld;
pub mod ndjson;
pub mod organizations;

pub use decode::{DecodeError, RecordDecoder};
pub use jsonld::JsonLdWriter;
pub use ndjson::{NdjsonLine, NdjsonReader};
pub use organizations::OrganizationMap;
