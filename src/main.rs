//! # lumiquant CLI
//!
//! A command-line tool for importing microplate luminescence reader exports
//! and quantifying conditions against a linear standard curve.
//!
//! ## Usage
//!
//! ```bash
//! # Inspect an export
//! lumiquant info run.csv
//!
//! # Export per-condition kinetic traces
//! lumiquant kinetics run.xlsx --guide layout.csv --output traces.csv
//!
//! # Fit a standard curve from known concentrations
//! lumiquant fit run.csv --guide layout.csv
//!
//! # Quantify against an explicit curve
//! lumiquant quant run.csv --guide layout.csv -m 120.5 -b 3.2 --low 0.1 --high 10
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
