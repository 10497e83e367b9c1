//! Output formatting for human and JSON modes
//!
//! This module provides structured output that can be rendered either as
//! human-readable text or machine-parseable JSON.

use colored::Colorize;
use serde::Serialize;

use crate::errors::ValidationError;

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

/// Result of validating one file against a schema
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    /// Whether the file validated without errors
    pub passed: bool,
    /// Number of records drawn from the source
    pub records_read: usize,
    /// Number of rows that validated cleanly
    pub rows_output: usize,
    /// Number of rows discarded over a failed required field
    pub rows_dropped: usize,
    /// Every validation error, in file order
    pub errors: Vec<ErrorEntry>,
}

/// One validation error, located
#[derive(Debug, Serialize)]
pub struct ErrorEntry {
    /// 0-based record index
    pub record: Option<usize>,
    /// 1-based file line number, when the source tracks it
    pub line: Option<u64>,
    /// Field name
    pub field: Option<String>,
    /// Full error message
    pub message: String,
}

impl From<&ValidationError> for ErrorEntry {
    fn from(err: &ValidationError) -> Self {
        Self {
            record: err.record,
            line: err.line,
            field: err.field.clone(),
            message: err.to_string(),
        }
    }
}

impl ValidationReport {
    /// Render the report based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => self.render_json(),
        }
    }

    fn render_human(&self) {
        if !self.errors.is_empty() {
            println!("Errors:");
            for entry in &self.errors {
                println!("  {}", entry.message);
            }
            println!();
        }

        println!(
            "{} record(s) read, {} row(s) valid, {} row(s) dropped, {} error(s)",
            self.records_read,
            self.rows_output,
            self.rows_dropped,
            self.errors.len()
        );

        if self.passed {
            println!("{}", "PASS".green().bold());
        } else {
            println!("{}", "FAIL".red().bold());
        }
    }

    fn render_json(&self) {
        println!(
            "{}",
            serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
        );
    }
}

/// Documentation of one schema field
#[derive(Debug, Serialize)]
pub struct FieldDoc {
    /// Field name
    pub name: String,
    /// Full documentation block
    pub doc: String,
}

/// Result of a describe operation
#[derive(Debug, Serialize)]
pub struct DescribeReport {
    /// Documentation for every declared field
    pub fields: Vec<FieldDoc>,
}

impl DescribeReport {
    /// Render the report based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => {
                for field in &self.fields {
                    println!("{}", field.name.bold());
                    for line in field.doc.lines() {
                        println!("    {line}");
                    }
                    println!();
                }
            },
            OutputMode::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
                );
            },
        }
    }
}
