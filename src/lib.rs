//! # tsvwatch
//!
//! Watches a drop directory for TSV files, validates every row against a
//! fixed fifteen-column schema, renders text and PDF reports, stores the
//! results in SurrealDB and serves them over a paginated HTTP API.
//!
//! The binary wires the workspace crates together:
//!
//! - `tsvwatch_core`: schema, documents, pagination, store contract
//! - `tsvwatch_ingest`: scanner, parser, renderers, cycle, scheduler
//! - `tsvwatch_store`: SurrealDB and in-memory stores
//! - `tsvwatch_web`: the axum router

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod cli;
pub mod config;

pub use cli::Cli;
pub use config::{Config, ConfigError, Overrides};
