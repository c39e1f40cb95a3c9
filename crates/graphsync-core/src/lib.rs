//! Graph-update synthesis engine.
//!
//! Turns one intermediate record (IR) into an ordered list of SPARQL update
//! statements against named graphs:
//!
//! - [`record`]: the typed IR (control keys, versioning flags, data fields)
//! - [`builder`]: per-predicate delete/insert statement construction
//! - [`expand`]: name/address cards, advising relationships, positions
//! - [`serializer`]: fixed emission order + recursion into nested records
//! - [`statement`]: typed `Delete`/`Insert` statements and their SPARQL text
//! - [`memory`]: an in-memory quad set that applies statements (tests, dry runs)
//!
//! The engine is pure: no I/O, no state across records. Submitting statements
//! to a store is the transport layer's job.

pub mod builder;
pub mod error;
pub mod expand;
pub mod memory;
pub mod record;
pub mod serializer;
pub mod statement;
pub mod term;
pub mod vocab;

pub use error::IrError;
pub use memory::MemoryStore;
pub use record::{Card, Fields, Position, Record, Supersede};
pub use serializer::Serializer;
pub use statement::{render_update, Triple, UpdateStatement};
pub use term::{Literal, Term};
pub use vocab::ContextNamespaces;
