//! rankeval CLI binary.

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rankeval::cli::args::*;
use rankeval::cli::commands::*;

fn main() {
    // Parse command line arguments using clap
    let args = RankEvalArgs::parse();

    // RUST_LOG wins over the verbosity flags
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
