//! Metadata source seam for the SchemaLens engine
//!
//! The engine is a pure function of its inputs; this crate defines the
//! trait its callers fetch metadata through, plus an in-memory mock used
//! by tests and demos. Real database-backed sources live with the
//! callers - the engine has no opinion on their failure modes beyond
//! accepting capability gaps as input.

pub mod mock;
pub mod provider;

pub use mock::{Capability, MockSource};
pub use provider::{FetchError, MetadataSource, TableIdentifier};
