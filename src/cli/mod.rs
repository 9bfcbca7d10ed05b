use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod fit;
mod info;
mod kinetics;
mod quant;

/// lumiquant - Plate-Reader Luminescence Quantification
#[derive(Parser)]
#[command(name = "lumiquant")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display information about a reader export file
    Info {
        /// Input export file path (.csv, .txt, .xlsx, .xls)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Export per-condition kinetic traces (mean and std per time point)
    Kinetics {
        /// Input export file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Plate-layout guide file assigning wells to conditions
        #[arg(short, long, value_name = "GUIDE")]
        guide: PathBuf,

        /// Output CSV path (stdout when omitted)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Fit a standard curve from conditions with known concentrations
    Fit {
        /// Input export file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Plate-layout guide file assigning wells to conditions
        #[arg(short, long, value_name = "GUIDE")]
        guide: PathBuf,
    },

    /// Quantify conditions against a standard curve
    Quant {
        /// Input export file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Plate-layout guide file assigning wells to conditions
        #[arg(short, long, value_name = "GUIDE")]
        guide: PathBuf,

        /// Output path (stdout when omitted)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Emit JSON instead of CSV
        #[arg(long)]
        json: bool,

        /// Standard curve preset CSV file (Name,m,b,Low,High)
        #[arg(long, value_name = "FILE")]
        preset_file: Option<PathBuf>,

        /// Name of the preset to use from the preset file
        #[arg(long, value_name = "NAME")]
        preset: Option<String>,

        /// Curve slope m (overrides presets)
        #[arg(short = 'm', long)]
        slope: Option<f64>,

        /// Curve intercept b (overrides presets)
        #[arg(short = 'b', long)]
        intercept: Option<f64>,

        /// Lower bound of the curve's validated range
        #[arg(long)]
        low: Option<f64>,

        /// Upper bound of the curve's validated range
        #[arg(long)]
        high: Option<f64>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Info { file } => info::run(file),
        Commands::Kinetics {
            file,
            guide,
            output,
        } => kinetics::run(file, guide, output),
        Commands::Fit { file, guide } => fit::run(file, guide),
        Commands::Quant {
            file,
            guide,
            output,
            json,
            preset_file,
            preset,
            slope,
            intercept,
            low,
            high,
            config,
        } => quant::run(quant::Args {
            file,
            guide,
            output,
            json,
            preset_file,
            preset,
            slope,
            intercept,
            low,
            high,
            config,
        }),
    }
}
