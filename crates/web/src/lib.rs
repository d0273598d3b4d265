//! tsvwatch HTTP API
//!
//! Read-only access to ingested documents, with tower middleware for CORS,
//! tracing, and compression. Handlers share the store with the ingestion
//! scheduler and never write to it.

#![forbid(unsafe_code)]
#![forbid(clippy::unwrap_used)]
#![forbid(clippy::panic)]
#![deny(clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, http::Method};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tsvwatch_core::DocumentStore;

pub mod error;
pub mod routes;
mod server;

pub use error::AppError;
pub use server::run_server;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    /// Upper bound on one store query.
    pub query_timeout: Duration,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, query_timeout: Duration) -> Self {
        Self {
            store,
            query_timeout,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("query_timeout", &self.query_timeout)
            .finish_non_exhaustive()
    }
}

/// Web server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `host:port`, for logs.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Create the application router with middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    routes::create_router().with_state(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(cors),
    )
}

/// Web server errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Binding or serving failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
