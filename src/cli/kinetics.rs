use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use lumiquant::conditions::{guide, PlateMap};
use lumiquant::{export, ingest};

/// Export per-condition kinetic traces as CSV
pub fn run(file: PathBuf, guide_path: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let series = ingest::load_series(&file)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    let mut map = PlateMap::new();
    let created = guide::load_guide(&mut map, &guide_path)
        .with_context(|| format!("Failed to import guide {}", guide_path.display()))?;
    info!("guide defined {created} condition(s)");
    if created == 0 {
        anyhow::bail!("Guide file defined no conditions: {}", guide_path.display());
    }

    let traces = map.kinetic_summaries(&series);
    if traces.is_empty() {
        anyhow::bail!("No condition has wells present in the loaded series");
    }

    match output {
        Some(path) => {
            export::write_kinetics_file(&path, series.times(), &traces)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => {
            export::write_kinetics(std::io::stdout().lock(), series.times(), &traces)
                .context("Failed to write kinetic traces")?;
        }
    }
    Ok(())
}
