//! TOML configuration file support for repeated quantification runs.
//!
//! Instead of passing many CLI flags, users can specify settings in a config file:
//!
//! ```toml
//! # lumiquant.toml
//! [quant]
//! preset_file = "curves.csv"
//! preset = "HiSens"
//! low = 0.1
//! high = 10.0
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root configuration structure for lumiquant.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Quantification settings.
    #[serde(default)]
    pub quant: QuantConfig,
}

/// Configuration for the quant command.
#[derive(Debug, Default, Deserialize)]
pub struct QuantConfig {
    /// Standard curve preset CSV file.
    pub preset_file: Option<PathBuf>,

    /// Name of the preset to use.
    pub preset: Option<String>,

    /// Curve slope m.
    pub slope: Option<f64>,

    /// Curve intercept b.
    pub intercept: Option<f64>,

    /// Lower bound of the curve's validated range.
    pub low: Option<f64>,

    /// Upper bound of the curve's validated range.
    pub high: Option<f64>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}
