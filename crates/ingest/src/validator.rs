//! Per-row validation against the column schema.
//!
//! Validation never fails a row. A short row is padded with empty values, a
//! long row is cut to the schema width, and a numeric column that does not
//! parse is cleared. Every problem comes back as a [`RowError`] alongside
//! the best-effort [`Record`].

use thiserror::Error;
use tsvwatch_core::{Field, FieldKind, Record, Schema};

/// A problem confined to one data row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// The row does not have one token per schema column.
    #[error("invalid number of columns: {actual} (must be {expected})")]
    ColumnCount { actual: usize, expected: usize },

    /// A numeric-constrained column holds something other than an integer.
    #[error("field \"{field}\" must be an integer")]
    NotAnInteger { field: Field },
}

impl RowError {
    /// The column the error is about, if it concerns a single column.
    #[must_use]
    pub const fn field(&self) -> Option<Field> {
        match self {
            Self::ColumnCount { .. } => None,
            Self::NotAnInteger { field } => Some(*field),
        }
    }

    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(self, Self::ColumnCount { .. })
    }
}

/// Validates tokenized rows against a fixed schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowValidator {
    schema: Schema,
}

impl RowValidator {
    #[must_use]
    pub const fn new(schema: Schema) -> Self {
        Self { schema }
    }

    #[must_use]
    pub const fn schema(&self) -> Schema {
        self.schema
    }

    /// Build a record from one row of tokens.
    ///
    /// The returned record's `errors` mirror the returned [`RowError`]s as
    /// messages.
    pub fn validate<S: AsRef<str>>(
        &self,
        tokens: &[S],
        expected_columns: usize,
    ) -> (Record, Vec<RowError>) {
        let mut record = Record::default();
        let mut errors = Vec::new();

        if tokens.len() != expected_columns {
            errors.push(RowError::ColumnCount {
                actual: tokens.len(),
                expected: expected_columns,
            });
        }

        for (field, token) in self.schema.fields().iter().copied().zip(tokens) {
            let value = AsRef::<str>::as_ref(token).trim();
            match check(field, value) {
                Ok(()) => record.set(field, value),
                Err(error) => errors.push(error),
            }
        }

        record.errors = errors.iter().map(ToString::to_string).collect();
        (record, errors)
    }

    /// Validate against the schema's own width.
    pub fn validate_row<S: AsRef<str>>(&self, tokens: &[S]) -> (Record, Vec<RowError>) {
        self.validate(tokens, self.schema.column_count())
    }
}

fn check(field: Field, value: &str) -> Result<(), RowError> {
    match field.kind() {
        FieldKind::Text => Ok(()),
        FieldKind::Integer if value.is_empty() => Ok(()),
        FieldKind::Integer => value
            .parse::<i64>()
            .map(|_| ())
            .map_err(|_| RowError::NotAnInteger { field }),
    }
}
