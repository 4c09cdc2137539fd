//! CLI argument types for the fixarrow binary.

use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use fixarrow::SourceEncoding;
use std::fmt;
use std::path::PathBuf;

/// Command-line tool for converting fixed-width record files to columnar formats.
#[derive(Parser, Debug)]
#[command(version)]
#[command(propagate_version = true)]
pub struct FixarrowCli {
    #[command(subcommand)]
    pub command: FixarrowCliCommands,
}

/// CLI subcommands for fixarrow.
#[derive(Debug, Subcommand)]
pub enum FixarrowCliCommands {
    /// Convert a fixed-width record file to Parquet or Feather
    Convert {
        /// Path to the fixed-width input file
        #[arg(value_hint = ValueHint::FilePath, value_parser)]
        input: PathBuf,
        /// Path to the JSON row layout file
        #[arg(long, value_hint = ValueHint::FilePath, value_parser)]
        layout: PathBuf,
        /// Output file path
        #[arg(long, short = 'o', value_hint = ValueHint::FilePath, value_parser)]
        output: PathBuf,
        /// Output file format
        #[arg(ignore_case = true, long, short = 'f', value_enum, value_parser, default_value = "parquet")]
        format: CliOutFormat,
        /// Number of worker threads; forced to 1 below the small-input threshold
        #[arg(long, default_value = "4", value_parser)]
        cores: usize,
        /// Per-column preallocated row capacity
        #[arg(long, default_value = "1024", value_parser)]
        column_cap: usize,
        /// Source byte encoding
        #[arg(ignore_case = true, long, value_enum, value_parser, default_value = "utf8")]
        encoding: CliEncoding,
        /// The input's first line is a header, not data
        #[arg(action, long)]
        has_header: bool,
        /// The input's last line is a footer, not data
        #[arg(action, long)]
        has_footer: bool,
        /// Compute and print a SHA-256 digest of the raw input bytes
        #[arg(action, long)]
        calc_hash: bool,
    },
}

/// CLI output file format (with clap `ValueEnum` derive).
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliOutFormat {
    /// Apache Parquet columnar format.
    Parquet,
    /// Feather (Arrow IPC) format.
    Feather,
}

impl fmt::Display for CliOutFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parquet => f.write_str("parquet"),
            Self::Feather => f.write_str("feather"),
        }
    }
}

/// CLI source encoding (with clap `ValueEnum` derive).
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliEncoding {
    /// UTF-8, LF-terminated.
    Utf8,
    /// ISO-8859-1, CRLF-terminated.
    Iso8859_1,
}

impl From<CliEncoding> for SourceEncoding {
    fn from(e: CliEncoding) -> Self {
        match e {
            CliEncoding::Utf8 => SourceEncoding::Utf8,
            CliEncoding::Iso8859_1 => SourceEncoding::Iso8859_1,
        }
    }
}

impl fmt::Display for CliEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utf8 => f.write_str("utf8"),
            Self::Iso8859_1 => f.write_str("iso8859-1"),
        }
    }
}
