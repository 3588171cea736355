//! Command line argument parsing for the rankeval CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::codec::Encoding;
use crate::parse::Strictness;

/// rankeval - validate and convert rated search requests
#[derive(Parser, Debug, Clone)]
#[command(name = "rankeval")]
#[command(about = "Validate and convert rated search request specifications")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct RankEvalArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl RankEvalArgs {
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

    /// Log filter directive matching the verbosity level.
    pub fn log_directive(&self) -> &'static str {
        match self.verbosity() {
            0 => "error",
            1 => "warn",
            2 => "info",
            3 => "debug",
            _ => "trace",
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Parse a rated request (or a batch) and report what it contains
    Validate(ValidateArgs),

    /// Re-encode a rated request (or a batch)
    Convert(ConvertArgs),
}

/// Options shared by every command that parses a document.
#[derive(clap::Args, Debug, Clone)]
pub struct ParseArgs {
    /// Skip unknown fields instead of failing
    #[arg(long)]
    pub lenient: bool,

    /// Treat the input as a batch of requests (`{"requests": [...]}`)
    #[arg(long)]
    pub batch: bool,

    /// Index to run against; replaces indices written in the document
    #[arg(long = "index", value_name = "INDEX")]
    pub indices: Vec<String>,

    /// Type to run against; replaces types written in the document
    #[arg(long = "type", value_name = "TYPE")]
    pub types: Vec<String>,
}

impl ParseArgs {
    pub fn strictness(&self) -> Strictness {
        if self.lenient {
            Strictness::Lenient
        } else {
            Strictness::Strict
        }
    }

    /// Whether a call-site scope was given at all.
    pub fn has_scope(&self) -> bool {
        !self.indices.is_empty() || !self.types.is_empty()
    }
}

/// Arguments for validating a document
#[derive(Parser, Debug, Clone)]
pub struct ValidateArgs {
    /// Document to validate
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Encoding of the document
    #[arg(short, long, default_value = "json")]
    pub encoding: Encoding,

    #[command(flatten)]
    pub parse: ParseArgs,
}

/// Arguments for converting a document between encodings
#[derive(Parser, Debug, Clone)]
pub struct ConvertArgs {
    /// Document to read
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// File to write
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Encoding of the input document
    #[arg(long, default_value = "json")]
    pub from: Encoding,

    /// Encoding of the output document
    #[arg(long, default_value = "binary")]
    pub to: Encoding,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub parse: ParseArgs,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
