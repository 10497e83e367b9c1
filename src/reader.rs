//! Validated record streams
//!
//! A [`RecordReader`] pulls raw records from a source (e.g. a
//! [`CsvSource`](crate::sources::CsvSource)), runs every cell through the
//! fields of a [`Schema`], and yields clean rows. What happens on a bad cell
//! is governed by the [`ErrorPolicy`]: stop at the first error, log it and
//! carry on, or hand it to a callback.
//!
//! With a non-stopping policy, a failed **required** field discards the
//! whole row - but only after the remaining fields were parsed too, so all
//! of a row's errors get reported and uniqueness state stays consistent. A
//! failed optional field is simply replaced by its default.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::iter;
use std::vec;

use thiserror::Error;

use crate::errors::ValidationError;
use crate::field::Field;
use crate::value::Value;

/// A validated output row: field name (after renames) to parsed value
pub type Row = BTreeMap<String, Value>;

/// A raw record drawn from a source, before validation
#[derive(Debug, Clone, Default)]
pub struct RawRecord {
    /// Cell values keyed by column name
    pub cells: BTreeMap<String, Value>,
    /// 1-based line number in the underlying file, when known
    pub line: Option<u64>,
}

impl RawRecord {
    /// Empty record with no line information
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cell (builder style, for tests and in-memory data)
    #[must_use]
    pub fn cell(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.cells.insert(name.into(), value.into());
        self
    }
}

impl From<BTreeMap<String, Value>> for RawRecord {
    fn from(cells: BTreeMap<String, Value>) -> Self {
        Self { cells, line: None }
    }
}

/// Errors in the schema definition itself
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A rename refers to a field the schema does not declare
    #[error("rename source '{0}' is not a declared field")]
    UnknownRename(String),
}

/// An ordered set of named fields, plus output renames.
///
/// Insertion order is parse order; that matters when a field's domain feeds
/// on the values another field has already accepted.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(String, Field)>,
    rename: HashMap<String, String>,
}

impl Schema {
    /// Empty schema
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field. Re-declaring a name replaces the earlier field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        let name = name.into();
        let field = field.named(name.clone());
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = field;
        } else {
            self.fields.push((name, field));
        }
        self
    }

    /// Rename a field in the output rows. The input column keeps the
    /// original name.
    #[must_use]
    pub fn rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.rename.insert(from.into(), to.into());
        self
    }

    /// Number of declared fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no fields are declared
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a field by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    /// Iterate fields in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(n, f)| (n.as_str(), f))
    }

    /// Output name for a field, after renames
    #[must_use]
    pub fn output_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.rename.get(name).map_or(name, String::as_str)
    }

    pub(crate) fn check_renames(&self) -> Result<(), SchemaError> {
        for from in self.rename.keys() {
            if self.get(from).is_none() {
                return Err(SchemaError::UnknownRename(from.clone()));
            }
        }
        Ok(())
    }

    /// Clone for a new run: fields reset their uniqueness state
    fn fresh(&self) -> Self {
        self.clone()
    }
}

/// Errors surfaced through a record stream
#[derive(Debug, Error)]
pub enum ReadError {
    /// A cell failed validation under [`ErrorPolicy::Raise`]
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The underlying CSV source failed
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// What to do when a cell fails validation
pub enum ErrorPolicy {
    /// Stop: the iterator yields the error and ends
    Raise,
    /// Log each error at the given level and keep going
    Log(log::Level),
    /// Hand each error to a callback and keep going
    Custom(Box<dyn FnMut(&ValidationError) + Send>),
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        Self::Raise
    }
}

impl fmt::Debug for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raise => write!(f, "Raise"),
            Self::Log(level) => write!(f, "Log({level})"),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

fn dispatch(policy: &mut ErrorPolicy, err: &ValidationError) {
    match policy {
        // Raise is handled by the caller
        ErrorPolicy::Raise => {},
        ErrorPolicy::Log(level) => log::log!(*level, "{err}"),
        ErrorPolicy::Custom(handler) => handler(err),
    }
}

/// Iterator adapter that validates raw records against a schema
pub struct RecordReader<I> {
    source: I,
    schema: Schema,
    policy: ErrorPolicy,
    record_num: Option<usize>,
    next_index: usize,
    fused: bool,
}

/// Source type used for in-memory record vectors
pub type VecSource =
    iter::Map<vec::IntoIter<RawRecord>, fn(RawRecord) -> Result<RawRecord, ReadError>>;

impl RecordReader<VecSource> {
    /// Read from an in-memory list of records (no line numbers)
    pub fn from_records(
        schema: &Schema,
        records: Vec<RawRecord>,
        policy: ErrorPolicy,
    ) -> Result<Self, SchemaError> {
        let wrap: fn(RawRecord) -> Result<RawRecord, ReadError> = Ok;
        Self::new(schema, records.into_iter().map(wrap), policy)
    }
}

impl<I> RecordReader<I>
where
    I: Iterator<Item = Result<RawRecord, ReadError>>,
{
    /// Wrap a record source.
    ///
    /// The schema is cloned per reader, so uniqueness state never leaks
    /// between runs over different files.
    pub fn new<S>(schema: &Schema, source: S, policy: ErrorPolicy) -> Result<Self, SchemaError>
    where
        S: IntoIterator<Item = Result<RawRecord, ReadError>, IntoIter = I>,
    {
        schema.check_renames()?;
        Ok(Self {
            source: source.into_iter(),
            schema: schema.fresh(),
            policy,
            record_num: None,
            next_index: 0,
            fused: false,
        })
    }

    /// Index of the last record drawn from the source (0-based), or None if
    /// iteration has not started. Skipped records still count.
    #[must_use]
    pub const fn record_num(&self) -> Option<usize> {
        self.record_num
    }

    /// The reader's working copy of the schema. Useful to reach a field's
    /// seen values after (or during) a run.
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }
}

/// A cell is blank for row-skipping purposes when it is null or a
/// whitespace-only string
fn cell_is_blank(value: &Value) -> bool {
    match value {
        Value::Str(s) => s.trim().is_empty(),
        v => v.is_null(),
    }
}

impl<I> Iterator for RecordReader<I>
where
    I: Iterator<Item = Result<RawRecord, ReadError>>,
{
    type Item = Result<Row, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fused {
            return None;
        }

        loop {
            let raw = match self.source.next()? {
                Ok(raw) => raw,
                Err(err) => {
                    self.fused = true;
                    return Some(Err(err));
                },
            };
            let index = self.next_index;
            self.next_index += 1;
            self.record_num = Some(index);

            // Strip stray whitespace from column headers
            let cells: BTreeMap<String, Value> = raw
                .cells
                .into_iter()
                .map(|(k, v)| (k.trim().to_string(), v))
                .collect();

            // Skip completely blank rows
            if cells.values().all(cell_is_blank) {
                log::debug!("skipping blank record {index}");
                continue;
            }

            let mut row = Row::new();
            let mut drop_row = false;

            for (name, field) in self.schema.fields.iter().map(|(n, f)| (n.as_str(), f)) {
                let out_name = self.schema.rename.get(name).map_or(name, String::as_str);
                // Missing columns are fine as long as the field is not
                // required
                let cell = cells.get(name).cloned().unwrap_or(Value::Null);

                match field.parse(cell) {
                    Ok(value) => {
                        row.insert(out_name.to_string(), value);
                    },
                    Err(err) => {
                        let err = err.with_location(Some(index), raw.line);
                        if matches!(self.policy, ErrorPolicy::Raise) {
                            self.fused = true;
                            return Some(Err(ReadError::Validation(err)));
                        }
                        dispatch(&mut self.policy, &err);
                        if field.is_required() {
                            drop_row = true;
                        } else {
                            row.insert(out_name.to_string(), field.default_value().clone());
                        }
                    },
                }
            }

            // A failed required field discards the whole row
            if drop_row {
                continue;
            }

            return Some(Ok(row));
        }
    }
}

impl<I> fmt::Debug for RecordReader<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordReader")
            .field("schema", &self.schema)
            .field("policy", &self.policy)
            .field("record_num", &self.record_num)
            .finish_non_exhaustive()
    }
}
