//! Health check endpoint: GET /health

/// GET /health - Liveness probe
pub async fn health_check() -> &'static str {
    "OK"
}
