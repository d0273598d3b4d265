//! Document store backends for tsvwatch.
//!
//! # Architecture
//!
//! - `SurrealDocumentStore`: connection management, schema setup and the
//!   `DocumentStore` operations against SurrealDB
//! - `InMemoryDocumentStore`: the same contract held in process memory
//!
//! # Example
//!
//! ```ignore
//! use tsvwatch_store::{StoreConfig, SurrealDocumentStore};
//!
//! let store = SurrealDocumentStore::connect(StoreConfig::websocket("localhost", 7998)).await?;
//! let processed = store.processed_names().await?;
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod client;
mod documents;
pub mod error;
pub mod memory;

pub use client::{Credentials, StoreConfig, SurrealDocumentStore};
pub use memory::InMemoryDocumentStore;
