use anyhow::{Context, Result};
use std::path::PathBuf;

use lumiquant::calibration;
use lumiquant::conditions::{guide, PlateMap};
use lumiquant::ingest;

/// Fit a standard curve from conditions carrying known concentrations
pub fn run(file: PathBuf, guide_path: PathBuf) -> Result<()> {
    let series = ingest::load_series(&file)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    let mut map = PlateMap::new();
    guide::load_guide(&mut map, &guide_path)
        .with_context(|| format!("Failed to import guide {}", guide_path.display()))?;

    let points = map.standard_points(&series);
    if points.is_empty() {
        anyhow::bail!(
            "No standards found: mark conditions with a known concentration \
             (guide cell syntax Name~Concentration)"
        );
    }

    let line = calibration::fit(&points).context("Standard curve fit failed")?;

    println!("Standard Curve Fit");
    println!("==================");
    println!("Points: {}", points.len());
    for (concentration, response) in &points {
        println!("  {concentration} -> {response:.2} RLU");
    }
    println!();
    println!("  m (slope):     {:.6}", line.slope);
    println!("  b (intercept): {:.6}", line.intercept);

    #[cfg(feature = "colorized_output")]
    {
        let style = if line.r_squared >= 0.98 {
            console::Style::new().green()
        } else {
            console::Style::new().yellow()
        };
        println!("  R²:            {}", style.apply_to(format!("{:.6}", line.r_squared)));
    }

    #[cfg(not(feature = "colorized_output"))]
    println!("  R²:            {:.6}", line.r_squared);

    Ok(())
}
