use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tsvwatch_core::{Document, Schema};

use super::{ERRORS_HEADING, RenderError, ReportRenderer, table_lines};

/// Plain-text report: the aligned record table, a blank line, then the
/// document's errors under a heading.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextReportRenderer {
    schema: Schema,
}

impl TextReportRenderer {
    #[must_use]
    pub const fn new(schema: Schema) -> Self {
        Self { schema }
    }

    fn write_report<W: Write>(&self, document: &Document, out: &mut W) -> std::io::Result<()> {
        for line in table_lines(self.schema, document) {
            writeln!(out, "{line}")?;
        }
        writeln!(out)?;
        writeln!(out, "{ERRORS_HEADING}")?;
        for error in &document.errors {
            writeln!(out, "{error}")?;
        }
        out.flush()
    }
}

impl ReportRenderer for TextReportRenderer {
    fn name(&self) -> &'static str {
        "text"
    }

    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, document: &Document, out_dir: &Path) -> Result<PathBuf, RenderError> {
        let path = self.report_path(document, out_dir);
        let file = File::create(&path).map_err(|e| RenderError::io(&path, e))?;
        self.write_report(document, &mut BufWriter::new(file))
            .map_err(|e| RenderError::io(&path, e))?;
        Ok(path)
    }
}
