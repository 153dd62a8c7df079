//! CLI argument definitions for the propsift pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "propsift",
    version,
    about = "Property CSV import and rule-based scoring",
    long_about = "Import property CSV exports into a local store and score them\n\
                  against rule configurations.\n\n\
                  The store is a JSON file; pass the same --store path to every\n\
                  command to work on one dataset."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import a property CSV file into the store.
    Import(ImportArgs),

    /// Score every stored property against a rule configuration.
    Score(ScoreArgs),

    /// List scored properties, optionally filtered and exported to CSV.
    Results(ResultsArgs),

    /// List the destination fields a CSV column can map to.
    Fields,
}

#[derive(Parser)]
pub struct ImportArgs {
    /// Path to the CSV file to import.
    #[arg(value_name = "CSV_FILE")]
    pub csv_file: PathBuf,

    /// Path of the JSON store file (created if missing).
    #[arg(long = "store", value_name = "PATH", default_value = "propsift.json")]
    pub store: PathBuf,

    /// Explicit column mapping, repeatable (e.g. --map "Owner 1 First=first_name").
    ///
    /// Explicit mappings take precedence over auto-mapping.
    #[arg(long = "map", value_name = "COLUMN=FIELD")]
    pub map: Vec<String>,

    /// Skip the auto-map pass; only explicit --map assignments apply.
    #[arg(long = "no-auto-map")]
    pub no_auto_map: bool,

    /// Proceed even when required destination fields are unmapped.
    #[arg(long = "allow-incomplete")]
    pub allow_incomplete: bool,

    /// Show the mapping and a data preview without writing anything.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct ScoreArgs {
    /// Path of the JSON store file.
    #[arg(long = "store", value_name = "PATH", default_value = "propsift.json")]
    pub store: PathBuf,

    /// Configuration id whose rules to apply.
    #[arg(long = "config", value_name = "CONFIG_ID")]
    pub configuration_id: String,

    /// JSON file of scoring rules to load into the store before the run.
    #[arg(long = "rules", value_name = "PATH")]
    pub rules: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ResultsArgs {
    /// Path of the JSON store file.
    #[arg(long = "store", value_name = "PATH", default_value = "propsift.json")]
    pub store: PathBuf,

    /// Configuration id whose scores to read.
    #[arg(long = "config", value_name = "CONFIG_ID")]
    pub configuration_id: String,

    /// Keep only properties scoring at least this much.
    #[arg(long = "min-score", value_name = "N", allow_hyphen_values = true)]
    pub min_score: Option<i64>,

    /// Keep only properties scoring at most this much.
    #[arg(long = "max-score", value_name = "N", allow_hyphen_values = true)]
    pub max_score: Option<i64>,

    /// Require this tag, repeatable (all named tags must be present).
    #[arg(long = "tag", value_name = "NAME")]
    pub tags: Vec<String>,

    /// Require membership in this list, repeatable.
    #[arg(long = "list", value_name = "NAME")]
    pub lists: Vec<String>,

    /// Write results as CSV to this path instead of printing a table.
    #[arg(long = "export", value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Comma-separated fields for the export (default: the required fields).
    #[arg(long = "fields", value_name = "FIELDS", value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Omit the header row from the export.
    #[arg(long = "no-headers")]
    pub no_headers: bool,

    /// Omit the score column from the export.
    #[arg(long = "no-scores")]
    pub no_scores: bool,

    /// Include id/import_batch_id/source columns in the export.
    #[arg(long = "include-metadata")]
    pub include_metadata: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
