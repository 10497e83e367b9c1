//! Print the documentation generated from a schema

use std::path::Path;
use std::process::ExitCode;

use fuzzyfields::config::SchemaFile;
use fuzzyfields::output::{DescribeReport, FieldDoc, OutputMode};

/// Print the generated documentation for every field in the schema
pub fn describe(schema_path: &Path, mode: OutputMode) -> anyhow::Result<ExitCode> {
    let schema = SchemaFile::load(schema_path)?.build()?;

    let fields = schema
        .iter()
        .map(|(name, field)| FieldDoc {
            name: name.to_string(),
            doc: field.describe(),
        })
        .collect();

    DescribeReport { fields }.render(mode);
    Ok(ExitCode::SUCCESS)
}
