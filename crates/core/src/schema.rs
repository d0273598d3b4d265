//! The fixed column layout of an ingested TSV file.
//!
//! A data row carries fifteen tab-separated columns in a fixed order. Four of
//! them are numeric-constrained: when non-empty they must parse as an
//! integer. Everything else is free-form text.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How the value of a column is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Stored verbatim after trimming.
    Text,
    /// Empty, or parses as an integer.
    Integer,
}

/// One column of the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    N,
    Mqqt,
    Invid,
    UnitGuid,
    MsgId,
    Text,
    Context,
    Class,
    Level,
    Area,
    Addr,
    Block,
    Type,
    Bit,
    InvertBit,
}

impl Field {
    /// All fields in column order.
    pub const ALL: [Self; 15] = [
        Self::N,
        Self::Mqqt,
        Self::Invid,
        Self::UnitGuid,
        Self::MsgId,
        Self::Text,
        Self::Context,
        Self::Class,
        Self::Level,
        Self::Area,
        Self::Addr,
        Self::Block,
        Self::Type,
        Self::Bit,
        Self::InvertBit,
    ];

    /// Column name as it appears in headers and serialized records.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::N => "n",
            Self::Mqqt => "mqqt",
            Self::Invid => "invid",
            Self::UnitGuid => "unit_guid",
            Self::MsgId => "msg_id",
            Self::Text => "text",
            Self::Context => "context",
            Self::Class => "class",
            Self::Level => "level",
            Self::Area => "area",
            Self::Addr => "addr",
            Self::Block => "block",
            Self::Type => "type",
            Self::Bit => "bit",
            Self::InvertBit => "invert_bit",
        }
    }

    #[must_use]
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::N | Self::Level | Self::Bit | Self::InvertBit => FieldKind::Integer,
            _ => FieldKind::Text,
        }
    }

    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self.kind(), FieldKind::Integer)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An ordered, immutable set of columns.
///
/// The schema is a value handed to the validator rather than shared global
/// state; [`Schema::STANDARD`] is the only layout the ingestion pipeline
/// uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    fields: &'static [Field],
}

impl Schema {
    /// The fifteen-column layout of every ingested file.
    pub const STANDARD: Self = Self { fields: &Field::ALL };

    /// Columns in order.
    #[must_use]
    pub const fn fields(&self) -> &'static [Field] {
        self.fields
    }

    /// Number of columns a well-formed row carries.
    #[must_use]
    pub const fn column_count(&self) -> usize {
        self.fields.len()
    }

    /// Column at a zero-based position, if the schema is that wide.
    #[must_use]
    pub fn field_at(&self, position: usize) -> Option<Field> {
        self.fields.get(position).copied()
    }

    /// Column names in order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(|field| field.name())
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::STANDARD
    }
}
