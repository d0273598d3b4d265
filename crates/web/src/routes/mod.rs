//! HTTP routes
//!
//! - `GET /docs?page=&limit=` - One page of stored documents
//! - `GET /health` - Liveness probe

use axum::{Router, routing::get};

use crate::AppState;

pub mod docs;
pub mod health;

/// Router with every endpoint registered, awaiting its state.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/docs", get(docs::list_docs))
        .route("/health", get(health::health_check))
}
