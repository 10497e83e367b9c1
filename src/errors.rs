//! Validation errors
//!
//! Every cell failure is a [`ValidationError`]: what went wrong
//! ([`ErrorKind`]) plus where it happened. The field name is filled in by the
//! field that failed; record and line numbers are attached later by the
//! record reader, which is the only layer that knows them.

use std::fmt;

use thiserror::Error;

use crate::value::Value;

/// What went wrong with a single cell
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    /// Value could not be parsed into the expected shape
    #[error("Malformed field: expected {expect}, got '{value}'")]
    Malformed {
        /// The offending value
        value: Value,
        /// What the field expected, e.g. "number"
        expect: String,
    },

    /// Value has a type the field cannot work with at all
    #[error("Invalid field type: expected {expect}, got '{value}'")]
    WrongType {
        /// The offending value
        value: Value,
        /// What the field expected
        expect: String,
    },

    /// Value already seen for a field declared unique
    #[error("Duplicate value: '{value}'")]
    Duplicate {
        /// The repeated value
        value: Value,
    },

    /// Value is not among the permitted choices
    #[error("value '{value}' is not acceptable (choices: {choices})")]
    OutOfDomain {
        /// The offending value
        value: Value,
        /// Human-readable list of permitted choices
        choices: String,
    },

    /// Field is blank but required
    #[error("Missing or blank field")]
    Missing,
}

/// A validation failure with source context
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// What went wrong
    pub kind: ErrorKind,
    /// Name of the failing field, when known
    pub field: Option<String>,
    /// 0-based index of the failing record, set by the record reader
    pub record: Option<usize>,
    /// 1-based line number in the underlying file, when the source tracks it
    pub line: Option<u64>,
}

impl ValidationError {
    /// Build an error with no location context yet
    #[must_use]
    pub fn new(kind: ErrorKind, field: Option<&str>) -> Self {
        Self {
            kind,
            field: field.map(str::to_string),
            record: None,
            line: None,
        }
    }

    /// A value that could not be parsed into the expected shape
    #[must_use]
    pub fn malformed(field: Option<&str>, value: Value, expect: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::Malformed {
                value,
                expect: expect.into(),
            },
            field,
        )
    }

    /// A value of a type the field cannot work with
    #[must_use]
    pub fn wrong_type(field: Option<&str>, value: Value, expect: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::WrongType {
                value,
                expect: expect.into(),
            },
            field,
        )
    }

    /// A repeated value on a unique field
    #[must_use]
    pub fn duplicate(field: Option<&str>, value: Value) -> Self {
        Self::new(ErrorKind::Duplicate { value }, field)
    }

    /// A value outside the permitted choices
    #[must_use]
    pub fn out_of_domain(field: Option<&str>, value: Value, choices: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::OutOfDomain {
                value,
                choices: choices.into(),
            },
            field,
        )
    }

    /// A blank cell on a required field
    #[must_use]
    pub fn missing(field: Option<&str>) -> Self {
        Self::new(ErrorKind::Missing, field)
    }

    /// Attach record/line context; existing context is not overwritten
    #[must_use]
    pub fn with_location(mut self, record: Option<usize>, line: Option<u64>) -> Self {
        if self.record.is_none() {
            self.record = record;
        }
        if self.line.is_none() {
            self.line = line;
        }
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(line) = self.line {
            write!(f, "At line {line}: ")?;
        } else if let Some(record) = self.record {
            write!(f, "At record {record}: ")?;
        }
        if let Some(field) = &self.field {
            write!(f, "Field {field}: ")?;
        }
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for ValidationError {}
