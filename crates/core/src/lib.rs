//! Core types for tsvwatch: the fixed column schema, parsed records and
//! documents, pagination, and the document store contract.

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod document;
pub mod error;
pub mod page;
pub mod schema;
pub mod store;

pub use document::{Document, Record};
pub use error::{StoreError, StoreResult};
pub use page::{DEFAULT_LIMIT, Page};
pub use schema::{Field, FieldKind, Schema};
pub use store::{DocumentStore, bounded};
