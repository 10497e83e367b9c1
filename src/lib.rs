//! fuzzyfields - tolerant parsing and validation of messy tabular data
//!
//! This library turns the kind of values found in hand-maintained spreadsheets
//! and CSV exports - numbers with thousands separators, accounting-style
//! negatives, booleans spelled a dozen ways, dates in ambiguous formats, and a
//! long tail of "N/A" spellings for blank cells - into clean, typed values,
//! or into precise errors saying which cell of which record is broken.

// Deny all clippy warnings in this crate
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod decimal;
pub mod errors;
pub mod field;
pub mod fields;
pub mod output;
pub mod reader;
pub mod sources;
pub mod value;

pub use decimal::Decimal;
pub use errors::{ErrorKind, ValidationError};
pub use field::{Field, FieldType, SharedValues};
pub use fields::{
    Boolean, DecimalField, Domain, Float, Integer, IsoCodeAlpha, Percentage, RegexField,
    StringField, Timestamp,
};
pub use reader::{ErrorPolicy, RawRecord, ReadError, RecordReader, Row, Schema};
pub use value::Value;
