//! One ingestion pass: refresh the processed set, scan, parse, render and
//! persist.
//!
//! The blocking part of a pass (directory listing, file reads, report
//! writes) runs on the blocking pool; the store calls stay on the runtime
//! and are bounded by the configured timeout. A pass either persists its
//! whole batch or nothing, so a failed pass is simply retried on the next
//! tick.

use std::collections::HashSet;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};
use tsvwatch_core::{Document, DocumentStore, StoreError, bounded};

use crate::parser::FileParser;
use crate::render::{ReportRenderer, default_renderers};
use crate::scanner::{ScanError, scan};
use crate::tracker::ProcessedSetTracker;

/// Where a cycle reads from and writes to.
#[derive(Debug, Clone)]
pub struct CycleConfig {
    /// Watched directory.
    pub source_dir: PathBuf,
    /// Directory receiving the rendered reports.
    pub output_dir: PathBuf,
    /// Upper bound on each store call.
    pub store_timeout: Duration,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("files"),
            output_dir: PathBuf::from("processed"),
            store_timeout: Duration::from_secs(3),
        }
    }
}

/// Counts from one completed pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// New files found and opened.
    pub candidates: usize,
    /// New files that could not be opened.
    pub skipped: usize,
    /// Documents written to the store.
    pub persisted: usize,
    /// Reports that failed to render.
    pub render_failures: usize,
}

/// A pass that did not complete. Nothing from it was persisted.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("failed to read processed set: {0}")]
    Tracker(#[source] StoreError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("failed to persist batch: {0}")]
    Persist(#[source] StoreError),

    #[error("ingestion worker failed: {0}")]
    Worker(String),
}

/// The ingestion pipeline for one watched directory.
pub struct IngestionCycle {
    config: CycleConfig,
    tracker: ProcessedSetTracker,
    store: Arc<dyn DocumentStore>,
    parser: FileParser,
    renderers: Arc<[Arc<dyn ReportRenderer>]>,
}

impl IngestionCycle {
    /// A cycle with the standard schema and the text and PDF renderers.
    #[must_use]
    pub fn new(config: CycleConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            tracker: ProcessedSetTracker::new(Arc::clone(&store), config.store_timeout),
            config,
            store,
            parser: FileParser::default(),
            renderers: default_renderers().into(),
        }
    }

    /// Replace the report renderers.
    #[must_use]
    pub fn with_renderers(mut self, renderers: Vec<Arc<dyn ReportRenderer>>) -> Self {
        self.renderers = renderers.into();
        self
    }

    #[must_use]
    pub const fn config(&self) -> &CycleConfig {
        &self.config
    }

    /// Run one pass.
    ///
    /// # Errors
    ///
    /// Returns a [`CycleError`] if the processed set cannot be read, the
    /// watched directory cannot be listed, or the batch cannot be persisted.
    /// Per-file and per-report problems are logged and counted instead.
    pub async fn run_once(&self) -> Result<CycleReport, CycleError> {
        let processed = self
            .tracker
            .current_processed()
            .await
            .map_err(CycleError::Tracker)?;

        let source_dir = self.config.source_dir.clone();
        let output_dir = self.config.output_dir.clone();
        let parser = self.parser;
        let renderers = Arc::clone(&self.renderers);

        let (documents, mut report) = tokio::task::spawn_blocking(move || {
            prepare_batch(&source_dir, &output_dir, &processed, parser, &renderers)
        })
        .await
        .map_err(|e| CycleError::Worker(e.to_string()))??;

        if documents.is_empty() {
            debug!(dir = %self.config.source_dir.display(), "No new files");
            return Ok(report);
        }

        let count = documents.len();
        bounded(self.config.store_timeout, self.store.insert_batch(documents))
            .await
            .map_err(CycleError::Persist)?;
        report.persisted = count;

        info!(
            candidates = report.candidates,
            persisted = report.persisted,
            skipped = report.skipped,
            render_failures = report.render_failures,
            "Ingestion cycle complete"
        );
        Ok(report)
    }
}

impl std::fmt::Debug for IngestionCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionCycle")
            .field("config", &self.config)
            .field("renderers", &self.renderers.iter().map(|r| r.name()).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

fn prepare_batch(
    source_dir: &Path,
    output_dir: &Path,
    processed: &HashSet<String>,
    parser: FileParser,
    renderers: &[Arc<dyn ReportRenderer>],
) -> Result<(Vec<Document>, CycleReport), ScanError> {
    let outcome = scan(source_dir, processed)?;
    let mut report = CycleReport {
        candidates: outcome.candidates.len(),
        skipped: outcome.skipped.len(),
        ..CycleReport::default()
    };

    let mut documents = Vec::with_capacity(outcome.candidates.len());
    for candidate in outcome.candidates {
        let document = parser
            .parse(BufReader::new(candidate.file))
            .with_id(candidate.name);

        for renderer in renderers {
            match renderer.render(&document, output_dir) {
                Ok(path) => debug!(file = %document.id, report = %path.display(), "Report written"),
                Err(e) => {
                    report.render_failures = report.render_failures.saturating_add(1);
                    warn!(
                        file = %document.id,
                        renderer = renderer.name(),
                        error = %e,
                        "Report rendering failed"
                    );
                }
            }
        }

        info!(
            file = %document.id,
            records = document.records.len(),
            errors = document.errors.len(),
            "File processed"
        );
        documents.push(document);
    }

    Ok((documents, report))
}
