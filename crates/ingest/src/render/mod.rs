//! Human-readable reports for ingested documents.
//!
//! Every document gets one report per renderer, written next to the others
//! in the output directory and named after the source file
//! (`alarms.tsv` gives `alarms.tsv.txt` and `alarms.tsv.pdf`). Rendering is
//! best-effort: a failure is logged by the cycle and never keeps a document
//! out of the store.

mod pdf;
mod text;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tsvwatch_core::{Document, Field, Schema};

pub use pdf::PdfReportRenderer;
pub use text::TextReportRenderer;

/// Heading that separates the record table from the document's errors.
pub const ERRORS_HEADING: &str = "Errors";

/// Spaces between two table columns.
const COLUMN_GAP: usize = 2;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write report '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build PDF report '{path}': {reason}")]
    Pdf { path: PathBuf, reason: String },
}

impl RenderError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn pdf(path: &Path, reason: impl ToString) -> Self {
        Self::Pdf {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// Writes one report for a document.
pub trait ReportRenderer: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Extension appended to the document id to name the report.
    fn extension(&self) -> &'static str;

    /// Write the report for `document` into `out_dir` and return its path.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if the report cannot be produced or written.
    fn render(&self, document: &Document, out_dir: &Path) -> Result<PathBuf, RenderError>;

    /// Where the report for `document` lands.
    fn report_path(&self, document: &Document, out_dir: &Path) -> PathBuf {
        out_dir.join(format!("{}.{}", document.id, self.extension()))
    }
}

/// The default pair: a text dump and a PDF.
#[must_use]
pub fn default_renderers() -> Vec<std::sync::Arc<dyn ReportRenderer>> {
    vec![
        std::sync::Arc::new(TextReportRenderer::default()),
        std::sync::Arc::new(PdfReportRenderer::default()),
    ]
}

/// Header plus one line per record, every column padded to its widest value.
pub(crate) fn table_lines(schema: Schema, document: &Document) -> Vec<String> {
    let fields = schema.fields();
    let mut widths: Vec<usize> = fields.iter().map(|f| f.name().chars().count()).collect();

    for record in &document.records {
        for (width, field) in widths.iter_mut().zip(fields) {
            *width = (*width).max(record.get(*field).chars().count());
        }
    }

    let header = aligned(fields.iter().map(|f| f.name().to_uppercase()), &widths);
    let rows = document
        .records
        .iter()
        .map(|record| aligned(fields.iter().map(|f: &Field| record.get(*f).to_string()), &widths));

    std::iter::once(header).chain(rows).collect()
}

fn aligned(cells: impl Iterator<Item = String>, widths: &[usize]) -> String {
    let mut line = String::new();
    for (cell, width) in cells.zip(widths) {
        let pad = width
            .saturating_sub(cell.chars().count())
            .saturating_add(COLUMN_GAP);
        line.push_str(&cell);
        line.extend(std::iter::repeat_n(' ', pad));
    }
    line.trim_end().to_string()
}
