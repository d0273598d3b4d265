//! # tsvwatch - entry point
//!
//! ## Startup
//!
//! 1. **Configuration** - YAML file, command-line overrides, validation
//! 2. **Directories** - create the watched and output directories
//! 3. **SurrealDB Connection** - connect, select namespace, define schema
//! 4. **Scheduler** - run the ingestion cycle on every tick
//! 5. **Axum API** - serve `GET /docs` and `GET /health`
//!
//! Any startup failure exits with an error before scanning or serving.
//!
//! ## Shutdown
//!
//! Ctrl+C stops the HTTP server after in-flight requests and stops the
//! scheduler once the current cycle, if any, has finished.

#![forbid(unsafe_code)]
#![forbid(clippy::unwrap_used)]
#![forbid(clippy::panic)]
#![deny(clippy::expect_used)]

use std::fs;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tsvwatch::{Cli, Config};
use tsvwatch_core::{DocumentStore, bounded};
use tsvwatch_ingest::{IngestionCycle, IntervalTicker, Scheduler};
use tsvwatch_store::SurrealDocumentStore;
use tsvwatch_web::{AppState, run_server};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    let start_time = Instant::now();
    init_tracing();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?
        .with_overrides(cli.overrides());
    config.validate().context("Invalid configuration")?;

    info!(
        source_dir = %config.source_dir.display(),
        output_dir = %config.output_dir.display(),
        interval_secs = config.scan_interval_secs,
        "tsvwatch starting"
    );

    prepare_directories(&config)?;
    let store: Arc<dyn DocumentStore> = Arc::new(
        init_store(&config)
            .await
            .context("Store initialization failed. Please check the database host and port")?,
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let shutdown_tx = Arc::new(shutdown_tx);

    let cycle = IngestionCycle::new(config.cycle_config(), Arc::clone(&store));
    let scheduler = Scheduler::new(cycle, IntervalTicker::new(config.scan_interval()));
    let scheduler_handle = tokio::spawn(scheduler.run(until_shutdown(shutdown_rx.clone())));

    let signal_tx = Arc::clone(&shutdown_tx);
    tokio::spawn(async move {
        if wait_for_shutdown().await {
            let _ = signal_tx.send(true);
        }
    });

    info!(
        "tsvwatch started in {:?}. Press Ctrl+C to stop.",
        start_time.elapsed()
    );

    let state = AppState::new(store, config.query_timeout());
    let served = run_server(&config.server_config(), state, until_shutdown(shutdown_rx)).await;
    // the server may also stop on its own, e.g. when the port is taken
    let _ = shutdown_tx.send(true);

    if let Err(e) = scheduler_handle.await {
        error!(error = %e, "Scheduler task failed");
    }
    served.with_context(|| {
        format!(
            "HTTP server on {} failed",
            config.server_config().bind_address()
        )
    })?;

    info!("tsvwatch stopped gracefully");
    Ok(())
}

/// Initialize tracing subscriber with environment filter.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tsvwatch=debug,tower_http=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn prepare_directories(config: &Config) -> Result<()> {
    for dir in [&config.source_dir, &config.output_dir] {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }
    Ok(())
}

/// Connect to SurrealDB and verify it answers.
async fn init_store(config: &Config) -> Result<SurrealDocumentStore> {
    let store_config = config.store_config();
    let url = store_config.url.clone();

    let store = bounded(CONNECT_TIMEOUT, SurrealDocumentStore::connect(store_config))
        .await
        .with_context(|| format!("Failed to connect to SurrealDB at {url}"))?;

    bounded(config.store_timeout(), store.health_check())
        .await
        .context("SurrealDB health check failed")?;

    info!(%url, "SurrealDB connected and healthy");
    Ok(store)
}

/// Resolves once shutdown has been requested.
async fn until_shutdown(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}

/// Wait for shutdown signal (Ctrl+C). Returns `false` if the signal
/// cannot be listened for.
async fn wait_for_shutdown() -> bool {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Received Ctrl+C, initiating graceful shutdown");
            true
        }
        Err(err) => {
            error!("Failed to listen for shutdown signal: {}", err);
            false
        }
    }
}
