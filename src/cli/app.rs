//! CLI definitions and entry point

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use fuzzyfields::output::OutputMode;

use super::commands;

/// fuzzyfields - validate messy tabular data
#[derive(Parser, Debug)]
#[command(
    name = "fuzzyfields",
    version,
    about = "Validate messy tabular data against a field schema",
    long_about = "Validate CSV files against a TOML schema of fuzzy fields.\n\n\
                  Fields tolerate the formats found in hand-maintained data:\n\
                  thousands separators, accounting negatives, percentages,\n\
                  a dozen spellings of true/false, ambiguous dates, and the\n\
                  long tail of N/A markers for blank cells."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a CSV file against a schema
    Validate {
        /// Path to the CSV file
        data: PathBuf,

        /// Path to the TOML schema file
        #[arg(short, long)]
        schema: PathBuf,

        /// Stop at the first validation error instead of reporting all
        #[arg(long)]
        fail_fast: bool,
    },

    /// Print the documentation generated from a schema
    Describe {
        /// Path to the TOML schema file
        #[arg(short, long)]
        schema: PathBuf,
    },
}

/// Run the CLI
pub fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    match cli.command {
        Command::Validate {
            data,
            schema,
            fail_fast,
        } => commands::validate(&data, &schema, fail_fast, output_mode),
        Command::Describe { schema } => commands::describe(&schema, output_mode),
    }
}
