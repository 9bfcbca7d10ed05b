//! CSV export of kinetic summaries and quantification results.

use std::io::Write;
use std::path::Path;

use crate::conditions::ConditionTrace;
use crate::quant::QuantRow;

/// Write per-condition kinetic traces as a wide CSV: a `Time` column followed
/// by a `(Mean)` and `(Std)` column pair per condition. Missing statistics
/// become empty cells.
pub fn write_kinetics<W: Write>(
    writer: W,
    times: &[f64],
    traces: &[ConditionTrace],
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec!["Time".to_string()];
    for trace in traces {
        header.push(format!("{} (Mean)", trace.name));
        header.push(format!("{} (Std)", trace.name));
    }
    csv_writer.write_record(&header)?;

    for (index, time) in times.iter().enumerate() {
        let mut record = vec![format!("{time}")];
        for trace in traces {
            record.push(optional(trace.mean.get(index).copied().flatten()));
            record.push(optional(trace.std_dev.get(index).copied().flatten()));
        }
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write kinetic traces to a file path.
pub fn write_kinetics_file(
    path: &Path,
    times: &[f64],
    traces: &[ConditionTrace],
) -> Result<(), csv::Error> {
    let file = std::fs::File::create(path).map_err(csv::Error::from)?;
    write_kinetics(file, times, traces)
}

/// Write quantification rows as a CSV report.
///
/// Concentration columns show `Error (m=0)` / `-` when the curve was
/// degenerate, and the concentration cell is suffixed with ` (out of range)`
/// when the measured value fell outside the curve's validated range.
pub fn write_quant<W: Write>(writer: W, rows: &[QuantRow]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "Condition",
        "Avg Peak RLU",
        "Concentration (µg/mL)",
        "Std Dev",
        "Dilution",
        "Stock Conc (µg/mL)",
    ])?;

    for row in rows {
        let concentration = match row.concentration {
            Some(value) if row.out_of_range => format!("{value:.4} (out of range)"),
            Some(value) => format!("{value:.4}"),
            None => "Error (m=0)".to_string(),
        };
        let concentration_std = match (row.concentration, row.concentration_std) {
            (None, _) => "-".to_string(),
            (_, Some(std)) => format!("{std:.4}"),
            (_, None) => String::new(),
        };
        let stock = match row.stock {
            Some(value) => format!("{value:.4}"),
            None => "-".to_string(),
        };
        csv_writer.write_record([
            row.condition.clone(),
            format!("{:.2}", row.peak_mean),
            concentration,
            concentration_std,
            format!("{}", row.dilution),
            stock,
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write quantification rows to a file path.
pub fn write_quant_file(path: &Path, rows: &[QuantRow]) -> Result<(), csv::Error> {
    let file = std::fs::File::create(path).map_err(csv::Error::from)?;
    write_quant(file, rows)
}

fn optional(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v}"),
        None => String::new(),
    }
}
