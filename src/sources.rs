//! Record sources
//!
//! Adapters that turn external inputs into streams of
//! [`RawRecord`](crate::reader::RawRecord) for the record reader. The CSV
//! source keeps track of file line numbers so validation errors can point at
//! the exact line of the offending cell.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::reader::{RawRecord, ReadError};
use crate::value::Value;

/// CSV-backed record source.
///
/// Reads the header row eagerly, then yields one [`RawRecord`] per data row:
/// cells are paired with headers by position, rows shorter than the header
/// leave the trailing columns blank, and cells beyond the header are
/// dropped - the usual behavior of dict-shaped CSV readers.
pub struct CsvSource<R> {
    records: csv::StringRecordsIntoIter<R>,
    headers: Vec<String>,
}

impl CsvSource<File> {
    /// Open a CSV file from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ReadError> {
        let path = path.as_ref();
        log::debug!("reading csv records from {}", path.display());
        let reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
        Self::from_csv_reader(reader)
    }
}

impl<R: Read> CsvSource<R> {
    /// Read CSV records from any reader (file, socket, in-memory buffer)
    pub fn new(input: R) -> Result<Self, ReadError> {
        let reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
        Self::from_csv_reader(reader)
    }

    fn from_csv_reader(mut reader: csv::Reader<R>) -> Result<Self, ReadError> {
        let headers = reader.headers()?.iter().map(str::to_string).collect();
        Ok(Self {
            records: reader.into_records(),
            headers,
        })
    }

    /// The column names from the header row
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl<R: Read> Iterator for CsvSource<R> {
    type Item = Result<RawRecord, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(err) => return Some(Err(err.into())),
        };

        let line = record.position().map(csv::Position::line);
        let mut cells = BTreeMap::new();
        for (i, header) in self.headers.iter().enumerate() {
            let value = record.get(i).map_or(Value::Null, |cell| Value::Str(cell.to_string()));
            cells.insert(header.clone(), value);
        }

        Some(Ok(RawRecord { cells, line }))
    }
}

impl<R> fmt::Debug for CsvSource<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsvSource").field("headers", &self.headers).finish_non_exhaustive()
    }
}
