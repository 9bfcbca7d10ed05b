use anyhow::{Context, Result};
use std::path::PathBuf;

use lumiquant::ingest;
use lumiquant::well::PlateFormat;

/// Display information about a reader export file
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let series = ingest::load_series(&file)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    let with_data = series.wells_with_data();
    let empty_columns = series.wells().len() - with_data.len();
    let format = PlateFormat::detect(&with_data);

    println!("Reader Export Information");
    println!("=========================");
    println!("File: {}", file.display());
    println!();

    println!("Time Series:");
    println!("  Time points: {}", series.len());
    if let (Some(first), Some(last)) = (series.times().first(), series.times().last()) {
        println!("  Time range:  {first} .. {last} min");
    }
    println!();

    println!("Wells:");
    println!("  Plate format:   {format}");
    println!("  With data:      {}", with_data.len());
    if empty_columns > 0 {
        println!("  Empty columns:  {empty_columns} (excluded)");
    }

    let labels: Vec<String> = with_data.iter().map(|well| well.to_string()).collect();
    println!("  {}", labels.join(" "));

    Ok(())
}
