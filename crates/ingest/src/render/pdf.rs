use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::{IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use tsvwatch_core::{Document, Schema};

use super::{ERRORS_HEADING, RenderError, ReportRenderer, table_lines};

// A2 landscape; the fifteen-column table does not fit anything narrower.
const PAGE_WIDTH: Mm = Mm(594.0);
const PAGE_HEIGHT: Mm = Mm(420.0);
const MARGIN: f32 = 10.0;
const LINE_HEIGHT: f32 = 4.5;
const FONT_SIZE: f32 = 9.0;
const RECORDS_HEADING: &str = "Records";

/// Monospaced TrueType face with Cyrillic coverage. Embedded text is written
/// as glyph ids, so nothing is lost to a single-byte encoding.
const REPORT_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSansMono.ttf");

/// Lines that fit under a page heading.
const LINES_PER_PAGE: usize = 88;

/// PDF report: the record table on one or more "Records" pages, then the
/// errors on one or more "Errors" pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfReportRenderer {
    schema: Schema,
}

impl PdfReportRenderer {
    #[must_use]
    pub const fn new(schema: Schema) -> Self {
        Self { schema }
    }

    fn build(&self, document: &Document) -> Result<PdfDocumentReference, printpdf::Error> {
        let (pdf, first_page, first_layer) =
            PdfDocument::new(document.id.clone(), PAGE_WIDTH, PAGE_HEIGHT, RECORDS_HEADING);
        let font = pdf.add_external_font(REPORT_FONT)?;

        let table = table_lines(self.schema, document);
        let mut first = Some((first_page, first_layer));
        for chunk in table.chunks(LINES_PER_PAGE) {
            let (page, layer) = first
                .take()
                .unwrap_or_else(|| pdf.add_page(PAGE_WIDTH, PAGE_HEIGHT, RECORDS_HEADING));
            write_page(&pdf.get_page(page).get_layer(layer), &font, RECORDS_HEADING, chunk);
        }

        let error_pages: Vec<&[String]> = if document.errors.is_empty() {
            vec![document.errors.as_slice()]
        } else {
            document.errors.chunks(LINES_PER_PAGE).collect()
        };
        for chunk in error_pages {
            let (page, layer) = pdf.add_page(PAGE_WIDTH, PAGE_HEIGHT, ERRORS_HEADING);
            write_page(&pdf.get_page(page).get_layer(layer), &font, ERRORS_HEADING, chunk);
        }

        Ok(pdf)
    }
}

fn write_page(layer: &PdfLayerReference, font: &IndirectFontRef, heading: &str, lines: &[String]) {
    let mut y = PAGE_HEIGHT.0 - MARGIN;
    layer.use_text(heading, FONT_SIZE, Mm(MARGIN), Mm(y), font);
    for line in lines {
        y -= LINE_HEIGHT;
        layer.use_text(line.as_str(), FONT_SIZE, Mm(MARGIN), Mm(y), font);
    }
}

impl ReportRenderer for PdfReportRenderer {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn render(&self, document: &Document, out_dir: &Path) -> Result<PathBuf, RenderError> {
        let path = self.report_path(document, out_dir);
        let pdf = self.build(document).map_err(|e| RenderError::pdf(&path, e))?;
        let file = File::create(&path).map_err(|e| RenderError::io(&path, e))?;
        pdf.save(&mut BufWriter::new(file))
            .map_err(|e| RenderError::pdf(&path, e))?;
        Ok(path)
    }
}
