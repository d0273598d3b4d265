//! Server setup

use std::future::Future;

use tokio::net::TcpListener;
use tracing::info;

use crate::{AppState, Error, ServerConfig, create_router};

/// Serve the API until `shutdown` resolves.
///
/// In-flight requests are allowed to complete before returning.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or serving fails.
pub async fn run_server<F>(config: &ServerConfig, state: AppState, shutdown: F) -> Result<(), Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);

    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!(address = %config.bind_address(), "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
