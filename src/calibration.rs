//! Linear standard curves: fitting, inversion, error propagation, and the
//! named-preset store.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

/// Errors raised by curve fitting, inversion, and preset loading.
#[derive(Debug, thiserror::Error)]
pub enum CalibrationError {
    /// The curve cannot support quantification (zero slope, or too few /
    /// collinear-degenerate points for a fit). Reported, never silently
    /// defaulted.
    #[error("degenerate calibration: {0}")]
    Degenerate(&'static str),

    /// I/O error while reading a preset file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed preset CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The preset file lacks a required column.
    #[error("preset file is missing column {0:?}")]
    MissingColumn(&'static str),

    /// No preset with the requested name.
    #[error("no standard curve preset named {0:?}")]
    UnknownPreset(String),
}

/// A linear response model `response = m * concentration + b` with an
/// optional validated concentration range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationCurve {
    /// Slope `m`.
    pub slope: f64,
    /// Intercept `b`.
    pub intercept: f64,
    /// Lower bound of the validated range, in concentration units.
    pub low: Option<f64>,
    /// Upper bound of the validated range, in concentration units.
    pub high: Option<f64>,
}

impl CalibrationCurve {
    /// Curve with no validated range.
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self {
            slope,
            intercept,
            low: None,
            high: None,
        }
    }

    /// Attach validated range bounds; either side may be open.
    pub fn with_range(mut self, low: Option<f64>, high: Option<f64>) -> Self {
        self.low = low;
        self.high = high;
        self
    }

    /// Map a measured response back to concentration:
    /// `(response - b) / m`.
    pub fn invert(&self, response: f64) -> Result<f64, CalibrationError> {
        if self.slope == 0.0 {
            return Err(CalibrationError::Degenerate("slope is zero"));
        }
        Ok((response - self.intercept) / self.slope)
    }

    /// First-order error propagation through the inversion:
    /// `stddev(concentration) = stddev(response) / |m|`.
    ///
    /// `m` and `b` are treated as fixed constants at apply time, so no
    /// covariance term is involved.
    pub fn propagate_std(&self, response_std: f64) -> Result<f64, CalibrationError> {
        if self.slope == 0.0 {
            return Err(CalibrationError::Degenerate("slope is zero"));
        }
        Ok(response_std / self.slope.abs())
    }

    /// Check a **pre-dilution** concentration against the validated range.
    ///
    /// Open sides always pass.
    pub fn in_range(&self, concentration: f64) -> bool {
        if self.low.is_some_and(|low| concentration < low) {
            return false;
        }
        if self.high.is_some_and(|high| concentration > high) {
            return false;
        }
        true
    }
}

/// Result of an ordinary least-squares line fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FittedLine {
    /// Fitted slope.
    pub slope: f64,
    /// Fitted intercept.
    pub intercept: f64,
    /// Coefficient of determination.
    pub r_squared: f64,
}

impl FittedLine {
    /// Use the fitted line as a calibration curve (no validated range).
    pub fn curve(&self) -> CalibrationCurve {
        CalibrationCurve::new(self.slope, self.intercept)
    }
}

/// Fit a line to `(concentration, response)` pairs by ordinary least squares.
///
/// Requires at least two points with distinct concentrations; anything less is
/// [`CalibrationError::Degenerate`].
pub fn fit(points: &[(f64, f64)]) -> Result<FittedLine, CalibrationError> {
    if points.len() < 2 {
        return Err(CalibrationError::Degenerate(
            "at least two calibration points are required",
        ));
    }

    let n = points.len() as f64;
    let x_mean = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let y_mean = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let sxx: f64 = points.iter().map(|(x, _)| (x - x_mean).powi(2)).sum();
    let syy: f64 = points.iter().map(|(_, y)| (y - y_mean).powi(2)).sum();
    let sxy: f64 = points
        .iter()
        .map(|(x, y)| (x - x_mean) * (y - y_mean))
        .sum();

    if sxx == 0.0 {
        return Err(CalibrationError::Degenerate(
            "calibration points share a single concentration",
        ));
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;
    let r_squared = if syy == 0.0 {
        0.0
    } else {
        (sxy * sxy) / (sxx * syy)
    };

    Ok(FittedLine {
        slope,
        intercept,
        r_squared,
    })
}

/// A named standard curve loaded from the preset store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurvePreset {
    /// Preset display name.
    pub name: String,
    /// Curve parameters, including the validated range when present.
    #[serde(flatten)]
    pub curve: CalibrationCurve,
}

/// Read-only collection of named standard curves.
///
/// Persisted as a CSV table with columns `Name,m,b,Low,High`; `Low`/`High`
/// cells that are absent or non-numeric leave that side of the validated
/// range open.
#[derive(Debug, Clone, Default)]
pub struct PresetStore {
    presets: Vec<CurvePreset>,
}

impl PresetStore {
    /// Load presets from a CSV file.
    pub fn from_csv_file(path: &Path) -> Result<Self, CalibrationError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load presets from any CSV reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CalibrationError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();
        let position = |name: &'static str| -> Result<usize, CalibrationError> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(CalibrationError::MissingColumn(name))
        };
        let name_col = position("name")?;
        let slope_col = position("m")?;
        let intercept_col = position("b")?;
        let low_col = headers.iter().position(|h| h == "low");
        let high_col = headers.iter().position(|h| h == "high");

        let field = |record: &csv::StringRecord, col: usize| -> Option<f64> {
            record.get(col).and_then(|v| v.trim().parse().ok())
        };

        let mut presets = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let name = record.get(name_col).unwrap_or("").trim().to_string();
            if name.is_empty() {
                continue;
            }
            let (Some(slope), Some(intercept)) =
                (field(&record, slope_col), field(&record, intercept_col))
            else {
                warn!("skipping preset {name:?}: non-numeric slope or intercept");
                continue;
            };
            let low = low_col.and_then(|col| field(&record, col));
            let high = high_col.and_then(|col| field(&record, col));
            presets.push(CurvePreset {
                name,
                curve: CalibrationCurve::new(slope, intercept).with_range(low, high),
            });
        }
        Ok(Self { presets })
    }

    /// Presets in file order.
    pub fn iter(&self) -> impl Iterator<Item = &CurvePreset> {
        self.presets.iter()
    }

    /// Look up a preset by name.
    pub fn get(&self, name: &str) -> Option<&CurvePreset> {
        self.presets.iter().find(|preset| preset.name == name)
    }

    /// Number of presets loaded.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// True when the store holds no presets.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_recovers_an_exact_line() {
        let line = fit(&[(1.0, 100.0), (2.0, 200.0)]).unwrap();
        assert_eq!(line.slope, 100.0);
        assert_eq!(line.intercept, 0.0);
        assert_eq!(line.r_squared, 1.0);
    }

    #[test]
    fn fit_with_scatter() {
        let line = fit(&[(0.0, 1.0), (1.0, 3.0), (2.0, 4.0)]).unwrap();
        assert!((line.slope - 1.5).abs() < 1e-12);
        assert!((line.intercept - (8.0 / 6.0)).abs() < 1e-12);
        assert!(line.r_squared > 0.9 && line.r_squared < 1.0);
    }

    #[test]
    fn degenerate_fits_are_reported() {
        assert!(matches!(
            fit(&[(1.0, 100.0)]),
            Err(CalibrationError::Degenerate(_))
        ));
        assert!(matches!(
            fit(&[(1.0, 100.0), (1.0, 200.0)]),
            Err(CalibrationError::Degenerate(_))
        ));
    }

    #[test]
    fn inversion_round_trips() {
        let curve = CalibrationCurve::new(100.0, 5.0);
        let c = 0.75;
        let response = curve.slope * c + curve.intercept;
        assert!((curve.invert(response).unwrap() - c).abs() < 1e-12);
    }

    #[test]
    fn zero_slope_inversion_is_an_error() {
        let flat = CalibrationCurve::new(0.0, 5.0);
        assert!(matches!(
            flat.invert(10.0),
            Err(CalibrationError::Degenerate(_))
        ));
        assert!(matches!(
            flat.propagate_std(1.0),
            Err(CalibrationError::Degenerate(_))
        ));
    }

    #[test]
    fn error_propagation_uses_absolute_slope() {
        let falling = CalibrationCurve::new(-50.0, 0.0);
        assert_eq!(falling.propagate_std(5.0).unwrap(), 0.1);
    }

    #[test]
    fn range_check_with_open_sides() {
        let bounded = CalibrationCurve::new(1.0, 0.0).with_range(Some(0.1), Some(10.0));
        assert!(bounded.in_range(0.1));
        assert!(bounded.in_range(10.0));
        assert!(!bounded.in_range(0.05));
        assert!(!bounded.in_range(11.0));

        let half_open = CalibrationCurve::new(1.0, 0.0).with_range(None, Some(10.0));
        assert!(half_open.in_range(-100.0));
        assert!(!half_open.in_range(11.0));

        assert!(CalibrationCurve::new(1.0, 0.0).in_range(f64::MAX));
    }

    #[test]
    fn preset_store_parses_bounds_leniently() {
        let csv = "Name,m,b,Low,High\n\
                   HiSens,120.5,3.2,0.05,8\n\
                   Legacy,80,0,,\n\
                   Odd,60,1,n/a,12\n\
                   Broken,not-a-number,0,0,1\n";
        let store = PresetStore::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(store.len(), 3);

        let hisens = store.get("HiSens").unwrap();
        assert_eq!(hisens.curve.slope, 120.5);
        assert_eq!(hisens.curve.low, Some(0.05));
        assert_eq!(hisens.curve.high, Some(8.0));

        let legacy = store.get("Legacy").unwrap();
        assert_eq!(legacy.curve.low, None);
        assert_eq!(legacy.curve.high, None);

        let odd = store.get("Odd").unwrap();
        assert_eq!(odd.curve.low, None);
        assert_eq!(odd.curve.high, Some(12.0));

        assert!(store.get("Broken").is_none());
        assert!(store.get("Missing").is_none());
    }

    #[test]
    fn preset_store_requires_core_columns() {
        let err = PresetStore::from_reader("Name,slope\nX,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, CalibrationError::MissingColumn("m")));
    }
}
