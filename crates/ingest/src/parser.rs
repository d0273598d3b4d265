//! Tab-separated file parsing.
//!
//! The first two rows of every file are headers and are discarded without
//! looking at them. Each following row goes through the [`RowValidator`];
//! its record is kept and its errors are copied into the document, prefixed
//! with the row's physical line number. Empty lines are skipped but still
//! counted. Nothing in a file's content can make parsing fail: unreadable
//! rows and missing headers become document errors too.
//!
//! Quoting is off. A `"` is an ordinary character, so a field can never
//! contain a tab and a stray quote is never an error. Readers in the RFC 4180
//! style differ here: they unquote `"a<TAB>b"` into one field and reject bare
//! quotes.

use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Terminator};
use thiserror::Error;
use tracing::debug;
use tsvwatch_core::{Document, Schema};

use crate::validator::RowValidator;

/// Header rows at the top of every file.
pub const HEADER_LINES: usize = 2;

/// A problem with the file as a whole rather than with one row's content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileError {
    /// The row could not be read, e.g. it is not valid UTF-8.
    #[error("line {line}: unreadable row: {reason}")]
    Read { line: u64, reason: String },

    /// The file ended before its header rows did.
    #[error("insufficient header lines ({required} required, found {found})")]
    InsufficientHeaders { found: usize, required: usize },
}

/// Turns a byte stream into a [`Document`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FileParser {
    validator: RowValidator,
}

impl FileParser {
    #[must_use]
    pub const fn new(schema: Schema) -> Self {
        Self {
            validator: RowValidator::new(schema),
        }
    }

    /// Parse a whole stream.
    ///
    /// The returned document has no id; the caller names it after the
    /// source file.
    pub fn parse<R: Read>(&self, input: R) -> Document {
        // Rows end at `\n` only, and the stream always ends with one, so after
        // each row the reader sits on the first line past it. A `\r` left by
        // CRLF input is trimmed away by the validator.
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .terminator(Terminator::Any(b'\n'))
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(input.chain(&b"\n"[..]));

        let expected = self.validator.schema().column_count();
        let mut document = Document::default();
        let mut row = StringRecord::new();
        let mut rows: usize = 0;
        let mut line: u64 = 0;

        loop {
            let read = reader.read_record(&mut row);
            let row_line = reader.position().line().saturating_sub(1);

            match read {
                Ok(false) => break,
                Ok(true) if is_blank_crlf_line(&row) => {}
                Ok(true) => {
                    line = row_line;
                    rows = rows.saturating_add(1);
                    if rows <= HEADER_LINES {
                        continue;
                    }
                    let tokens: Vec<&str> = row.iter().collect();
                    let (record, errors) = self.validator.validate(&tokens, expected);
                    document
                        .errors
                        .extend(errors.iter().map(|error| format!("line {line}: {error}")));
                    document.records.push(record);
                }
                Err(err) => {
                    let fatal = err.is_io_error();
                    // a failing source leaves the position where it was
                    line = if fatal { line.saturating_add(1) } else { row_line };
                    rows = rows.saturating_add(1);
                    document.errors.push(
                        FileError::Read {
                            line,
                            reason: err.to_string(),
                        }
                        .to_string(),
                    );
                    // the reader cannot advance past a failing source
                    if fatal {
                        break;
                    }
                }
            }
        }

        if rows < HEADER_LINES {
            document.errors.push(
                FileError::InsufficientHeaders {
                    found: rows,
                    required: HEADER_LINES,
                }
                .to_string(),
            );
        }

        debug!(
            rows,
            records = document.records.len(),
            errors = document.errors.len(),
            "Parsed TSV stream"
        );
        document
    }
}

/// An empty line from CRLF input: the lone `\r` the `\n` terminator leaves.
fn is_blank_crlf_line(row: &StringRecord) -> bool {
    row.len() == 1 && row.as_slice() == "\r"
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADERS: &str = "N\tMQQT\tINVID\tUNIT_GUID\tMSG_ID\tTEXT\tCONTEXT\tCLASS\tLEVEL\tAREA\tADDR\tBLOCK\tTYPE\tBIT\tINVERT_BIT\n\
                           num\tstr\tstr\tstr\tstr\tstr\tstr\tstr\tnum\tstr\tstr\tstr\tstr\tnum\tnum\n";

    const ROW: &str = "1\tmq\tinv\tguid-1\tm1\tDoor open\tctx\talarm\t2\tnorth\t0x10\tB1\tbool\t3\t0\n";

    fn parse(input: &[u8]) -> Document {
        FileParser::default().parse(input)
    }

    #[test]
    fn test_headers_only_yields_empty_clean_document() {
        let document = parse(HEADERS.as_bytes());

        assert!(document.records.is_empty());
        assert!(document.errors.is_empty());
    }

    #[test]
    fn test_empty_stream_reports_missing_headers() {
        let document = parse(b"");

        assert!(document.records.is_empty());
        assert_eq!(
            document.errors,
            vec!["insufficient header lines (2 required, found 0)"]
        );
    }

    #[test]
    fn test_single_header_line_reports_missing_headers() {
        let document = parse(b"N\tMQQT\n");

        assert!(document.records.is_empty());
        assert_eq!(document.errors.len(), 1);
        assert!(
            document
                .errors
                .iter()
                .all(|e| e.contains("insufficient header lines"))
        );
    }

    #[test]
    fn test_header_content_is_never_validated() {
        let input = "abc\tnot\ta\tschema\nxyz\n".to_string() + ROW;
        let document = parse(input.as_bytes());

        assert_eq!(document.records.len(), 1);
        assert!(document.errors.is_empty());
    }

    #[test]
    fn test_records_keep_source_order() {
        let input = format!(
            "{HEADERS}{}{}{}",
            ROW.replacen('1', "10", 1),
            ROW.replacen('1', "20", 1),
            ROW.replacen('1', "30", 1)
        );

        let document = parse(input.as_bytes());

        let ns: Vec<&str> = document.records.iter().map(|r| r.n.as_str()).collect();
        assert_eq!(ns, vec!["10", "20", "30"]);
    }

    #[test]
    fn test_invalid_n_reported_with_line_and_field() {
        let input = format!("{HEADERS}{}", ROW.replacen('1', "abc", 1));

        let document = parse(input.as_bytes());

        assert_eq!(document.records.len(), 1);
        assert!(document.records.iter().all(|r| r.n.is_empty()));
        assert_eq!(
            document.errors,
            vec!["line 3: field \"n\" must be an integer"]
        );
        assert!(
            document
                .records
                .iter()
                .all(|r| r.errors == vec!["field \"n\" must be an integer"])
        );
    }

    #[test]
    fn test_short_row_reports_structural_error() {
        let short = "1\tmq\tinv\tguid\tm1\ttext\tctx\tcls\t2\tarea\n";
        let input = format!("{HEADERS}{short}");

        let document = parse(input.as_bytes());

        assert_eq!(
            document.errors,
            vec!["line 3: invalid number of columns: 10 (must be 15)"]
        );
        let record = document.records.first();
        assert!(record.is_some_and(|r| r.area == "area"
            && r.addr.is_empty()
            && r.block.is_empty()
            && r.kind.is_empty()
            && r.bit.is_empty()
            && r.invert_bit.is_empty()));
    }

    #[test]
    fn test_invalid_utf8_row_is_skipped_not_fatal() {
        let mut input = HEADERS.as_bytes().to_vec();
        input.extend_from_slice(ROW.as_bytes());
        input.extend_from_slice(b"2\t\xff\xfe\tinv\n");
        input.extend_from_slice(ROW.replacen('1', "4", 1).as_bytes());

        let document = parse(&input);

        assert_eq!(document.records.len(), 2);
        assert_eq!(document.errors.len(), 1);
        assert!(
            document
                .errors
                .iter()
                .all(|e| e.starts_with("line 4: unreadable row"))
        );
    }

    #[test]
    fn test_quotes_are_plain_characters() {
        let quoted = ROW.replace("Door open", "\"Door\" open");
        let input = format!("{HEADERS}{quoted}");

        let document = parse(input.as_bytes());

        assert!(document.errors.is_empty());
        assert!(
            document
                .records
                .iter()
                .all(|r| r.text == "\"Door\" open")
        );
    }

    #[test]
    fn test_errors_accumulate_across_rows() {
        let input = format!(
            "{HEADERS}{}{}",
            ROW.replace("\t2\t", "\tlow\t"),
            "x\tonly\n"
        );

        let document = parse(input.as_bytes());

        assert_eq!(
            document.errors,
            vec![
                "line 3: field \"level\" must be an integer",
                "line 4: invalid number of columns: 2 (must be 15)",
                "line 4: field \"n\" must be an integer",
            ]
        );
        assert_eq!(document.records.len(), 2);
    }

    #[test]
    fn test_blank_lines_keep_physical_line_numbers() {
        let input = format!("{HEADERS}\n{ROW}\n\nx\tonly\n");

        let document = parse(input.as_bytes());

        assert_eq!(document.records.len(), 2);
        assert_eq!(
            document.errors,
            vec![
                "line 7: invalid number of columns: 2 (must be 15)",
                "line 7: field \"n\" must be an integer",
            ]
        );
    }

    #[test]
    fn test_blank_line_between_headers_and_rows() {
        let document = parse(b"h1\nh2\n\n1\ta\n");

        assert_eq!(document.records.len(), 1);
        assert!(
            document
                .errors
                .first()
                .is_some_and(|e| e == "line 4: invalid number of columns: 2 (must be 15)")
        );
    }

    #[test]
    fn test_crlf_input_counts_lines_like_lf() {
        let input = format!("{HEADERS}{ROW}\r\nx\tonly\r\n").replace('\n', "\r\n");
        let input = input.replace("\r\r\n", "\r\n");

        let document = parse(input.as_bytes());

        assert_eq!(document.records.len(), 2);
        assert!(
            document
                .records
                .first()
                .is_some_and(|r| r.invert_bit == "0" && r.errors.is_empty())
        );
        assert_eq!(
            document.errors,
            vec![
                "line 5: invalid number of columns: 2 (must be 15)",
                "line 5: field \"n\" must be an integer",
            ]
        );
    }

    #[test]
    fn test_missing_trailing_newline_keeps_last_row() {
        let input = format!("{HEADERS}{}", ROW.replacen('1', "abc", 1).trim_end());

        let document = parse(input.as_bytes());

        assert_eq!(document.records.len(), 1);
        assert_eq!(
            document.errors,
            vec!["line 3: field \"n\" must be an integer"]
        );
    }
}
