//! Command line argument parsing for the InfoBase CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// InfoBase - selector indexing and support counting for rule learners
#[derive(Parser, Debug, Clone)]
#[command(name = "infobase")]
#[command(about = "Selector indexing and support counting for local-rule learners")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct InfoBaseArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl InfoBaseArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Ingest a CSV dataset and save the InfoBase
    Build(BuildArgs),

    /// Show InfoBase statistics
    Stats(StatsArgs),

    /// List constructing selectors
    Selectors(SelectorsArgs),

    /// Support count of a conjunction of selectors
    Support(SupportArgs),

    /// Convert a record to selector IDs
    Convert(ConvertArgs),

    /// Time support counting over random conjunctions
    Benchmark(BenchmarkArgs),
}

/// Where an InfoBase comes from: a CSV file to ingest or a saved file.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// CSV dataset (`.csv`) or saved InfoBase file
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Label column name (default: last column)
    #[arg(short, long)]
    pub label: Option<String>,

    /// CSV delimiter
    #[arg(short, long, default_value = ",")]
    pub delimiter: char,

    /// Ingestion configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Ingest row shards in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Leave missing-value symbols out of the index
    #[arg(long)]
    pub skip_missing: bool,
}

impl SourceArgs {
    /// Whether the source should be ingested rather than loaded.
    pub fn is_csv(&self) -> bool {
        self.source
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
    }
}

/// Arguments for building an InfoBase
#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output file
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Overwrite an existing output file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Arguments for listing selectors
#[derive(Parser, Debug, Clone)]
pub struct SelectorsArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Minimum support count of feature selectors
    #[arg(short, long, default_value = "0")]
    pub min_support: usize,

    /// Maximum number of selectors to print
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Arguments for support counting
#[derive(Parser, Debug, Clone)]
pub struct SupportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Selector IDs (comma-separated)
    #[arg(long, value_delimiter = ',', required_unless_present = "select")]
    pub ids: Vec<u32>,

    /// Selectors as column=value (repeatable)
    #[arg(short = 's', long = "select", value_name = "COLUMN=VALUE")]
    pub select: Vec<String>,
}

/// Arguments for record conversion
#[derive(Parser, Debug, Clone)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Feature values (comma-separated, label excluded)
    #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
    pub record: Vec<String>,

    /// Report unknown values as null instead of failing
    #[arg(long)]
    pub lenient: bool,
}

/// Arguments for benchmarking
#[derive(Parser, Debug, Clone)]
pub struct BenchmarkArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Number of queries
    #[arg(short = 'n', long, default_value = "10000")]
    pub queries: usize,

    /// Maximum selectors per query (drawn from one training record)
    #[arg(short = 'k', long, default_value = "4")]
    pub max_length: usize,

    /// Random seed
    #[arg(long, default_value = "42")]
    pub seed: u64,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
