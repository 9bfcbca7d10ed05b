use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use lumiquant::calibration::{CalibrationCurve, CalibrationError, PresetStore};
use lumiquant::conditions::{guide, PlateMap};
use lumiquant::{export, ingest, quant};

use super::config::Config;

/// Inputs for the quant command, resolved from flags and the optional config
/// file.
pub struct Args {
    pub file: PathBuf,
    pub guide: PathBuf,
    pub output: Option<PathBuf>,
    pub json: bool,
    pub preset_file: Option<PathBuf>,
    pub preset: Option<String>,
    pub slope: Option<f64>,
    pub intercept: Option<f64>,
    pub low: Option<f64>,
    pub high: Option<f64>,
    pub config: Option<PathBuf>,
}

/// Quantify conditions against a standard curve
pub fn run(args: Args) -> Result<()> {
    let series = ingest::load_series(&args.file)
        .with_context(|| format!("Failed to import {}", args.file.display()))?;

    let mut map = PlateMap::new();
    guide::load_guide(&mut map, &args.guide)
        .with_context(|| format!("Failed to import guide {}", args.guide.display()))?;

    let curve = resolve_curve(&args)?;
    info!(
        "using curve m={}, b={}, range {:?}..{:?}",
        curve.slope, curve.intercept, curve.low, curve.high
    );

    let rows = quant::quantify(&map, &series, &curve);
    if rows.is_empty() {
        anyhow::bail!("No condition has wells present in the loaded series");
    }

    for row in &rows {
        if row.out_of_range {
            warn_out_of_range(row);
        }
    }

    match (&args.output, args.json) {
        (Some(path), true) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            serde_json::to_writer_pretty(file, &rows).context("Failed to serialize results")?;
        }
        (Some(path), false) => {
            export::write_quant_file(path, &rows)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        (None, true) => {
            serde_json::to_writer_pretty(std::io::stdout().lock(), &rows)
                .context("Failed to serialize results")?;
            println!();
        }
        (None, false) => {
            export::write_quant(std::io::stdout().lock(), &rows)
                .context("Failed to write results")?;
        }
    }
    Ok(())
}

/// Resolve the calibration curve: explicit flags beat a named preset, which
/// beats config-file values.
fn resolve_curve(args: &Args) -> Result<CalibrationCurve> {
    let file_config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let quant = file_config.quant;

    let slope = args.slope.or(quant.slope);
    let intercept = args.intercept.or(quant.intercept);
    if let Some(slope) = slope {
        let curve = CalibrationCurve::new(slope, intercept.unwrap_or(0.0)).with_range(
            args.low.or(quant.low),
            args.high.or(quant.high),
        );
        return Ok(curve);
    }

    let preset_file = args.preset_file.clone().or(quant.preset_file);
    let preset_name = args.preset.clone().or(quant.preset);
    if let (Some(path), Some(name)) = (&preset_file, &preset_name) {
        let store = PresetStore::from_csv_file(path)
            .with_context(|| format!("Failed to read preset file {}", path.display()))?;
        let preset = store
            .get(name)
            .ok_or_else(|| CalibrationError::UnknownPreset(name.clone()))?;
        let mut curve = preset.curve.clone();
        // Explicit range flags still override the preset's bounds.
        if args.low.is_some() || quant.low.is_some() {
            curve.low = args.low.or(quant.low);
        }
        if args.high.is_some() || quant.high.is_some() {
            curve.high = args.high.or(quant.high);
        }
        return Ok(curve);
    }

    anyhow::bail!(
        "No standard curve specified: pass --slope/--intercept, or \
         --preset-file with --preset, or a config file"
    )
}

#[cfg(feature = "colorized_output")]
fn warn_out_of_range(row: &quant::QuantRow) {
    let style = console::Style::new().red().bold();
    eprintln!(
        "{} {} measured outside the curve's validated range",
        style.apply_to("warning:"),
        row.condition
    );
}

#[cfg(not(feature = "colorized_output"))]
fn warn_out_of_range(row: &quant::QuantRow) {
    eprintln!(
        "warning: {} measured outside the curve's validated range",
        row.condition
    );
}
