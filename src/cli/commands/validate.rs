//! Validate a CSV file against a schema

use std::path::Path;
use std::process::ExitCode;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Context;

use fuzzyfields::config::SchemaFile;
use fuzzyfields::output::{ErrorEntry, OutputMode, ValidationReport};
use fuzzyfields::sources::CsvSource;
use fuzzyfields::{ErrorPolicy, ReadError, RecordReader, ValidationError};

/// Validate `data` against the schema at `schema_path`; exit code reflects
/// whether any cell failed
pub fn validate(
    data: &Path,
    schema_path: &Path,
    fail_fast: bool,
    mode: OutputMode,
) -> anyhow::Result<ExitCode> {
    let schema = SchemaFile::load(schema_path)?.build()?;
    let source = CsvSource::from_path(data)
        .with_context(|| format!("cannot open {}", data.display()))?;

    let collected: Arc<Mutex<Vec<ValidationError>>> = Arc::new(Mutex::new(Vec::new()));
    let policy = if fail_fast {
        ErrorPolicy::Raise
    } else {
        let sink = Arc::clone(&collected);
        ErrorPolicy::Custom(Box::new(move |err| {
            sink.lock().unwrap_or_else(PoisonError::into_inner).push(err.clone());
        }))
    };

    let mut reader = RecordReader::new(&schema, source, policy)?;
    let mut rows_output = 0usize;
    for row in reader.by_ref() {
        match row {
            Ok(_) => rows_output += 1,
            Err(ReadError::Validation(err)) => {
                // fail_fast: surface the single error and stop
                collected.lock().unwrap_or_else(PoisonError::into_inner).push(err);
                break;
            },
            Err(err @ ReadError::Csv(_)) => {
                return Err(anyhow::Error::new(err)
                    .context(format!("cannot read {}", data.display())));
            },
        }
    }

    let records_read = reader.record_num().map_or(0, |n| n + 1);
    let errors = collected.lock().unwrap_or_else(PoisonError::into_inner);
    let error_entries: Vec<ErrorEntry> = errors.iter().map(ErrorEntry::from).collect();

    let report = ValidationReport {
        passed: error_entries.is_empty(),
        records_read,
        rows_output,
        rows_dropped: count_dropped(&schema, &errors),
        errors: error_entries,
    };
    report.render(mode);

    Ok(if report.passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Number of distinct records that lost a required field (and hence the row)
fn count_dropped(schema: &fuzzyfields::Schema, errors: &[ValidationError]) -> usize {
    let mut records: Vec<usize> = errors
        .iter()
        .filter(|e| {
            e.field
                .as_deref()
                .and_then(|name| schema.get(name))
                .is_some_and(fuzzyfields::Field::is_required)
        })
        .filter_map(|e| e.record)
        .collect();
    records.sort_unstable();
    records.dedup();
    records.len()
}
