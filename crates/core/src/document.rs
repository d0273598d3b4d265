//! Parsed records and the per-file documents that carry them.

use serde::{Deserialize, Serialize};

use crate::schema::Field;

/// One data row of a source file.
///
/// Every schema column has a slot, even when the source row was short.
/// Numeric columns hold their original text when valid and are empty when
/// validation failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub n: String,
    pub mqqt: String,
    pub invid: String,
    pub unit_guid: String,
    pub msg_id: String,
    pub text: String,
    pub context: String,
    pub class: String,
    pub level: String,
    pub area: String,
    pub addr: String,
    pub block: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub bit: String,
    pub invert_bit: String,
    /// Validation messages for this row only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl Record {
    /// Value stored for a column.
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::N => &self.n,
            Field::Mqqt => &self.mqqt,
            Field::Invid => &self.invid,
            Field::UnitGuid => &self.unit_guid,
            Field::MsgId => &self.msg_id,
            Field::Text => &self.text,
            Field::Context => &self.context,
            Field::Class => &self.class,
            Field::Level => &self.level,
            Field::Area => &self.area,
            Field::Addr => &self.addr,
            Field::Block => &self.block,
            Field::Type => &self.kind,
            Field::Bit => &self.bit,
            Field::InvertBit => &self.invert_bit,
        }
    }

    /// Replace the value stored for a column.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::N => &mut self.n,
            Field::Mqqt => &mut self.mqqt,
            Field::Invid => &mut self.invid,
            Field::UnitGuid => &mut self.unit_guid,
            Field::MsgId => &mut self.msg_id,
            Field::Text => &mut self.text,
            Field::Context => &mut self.context,
            Field::Class => &mut self.class,
            Field::Level => &mut self.level,
            Field::Area => &mut self.area,
            Field::Addr => &mut self.addr,
            Field::Block => &mut self.block,
            Field::Type => &mut self.kind,
            Field::Bit => &mut self.bit,
            Field::InvertBit => &mut self.invert_bit,
        };
        *slot = value.into();
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// One ingested source file.
///
/// The filename is the primary key across the store. Records keep the row
/// order of the source file; `errors` holds every problem found while
/// parsing it, row-level ones prefixed with their line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Source filename, e.g. `batch-01.tsv`.
    pub id: String,
    pub records: Vec<Record>,
    pub errors: Vec<String>,
}

impl Document {
    /// Create an empty document for a filename.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            records: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Assign the filename once parsing is done.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}
