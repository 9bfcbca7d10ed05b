//! Applying a calibration curve to condition peak responses.

use log::warn;
use serde::Serialize;

use crate::calibration::CalibrationCurve;
use crate::conditions::PlateMap;
use crate::series::SeriesTable;

/// One quantification result row, one per condition with resolvable wells.
#[derive(Debug, Clone, Serialize)]
pub struct QuantRow {
    /// Condition display name.
    pub condition: String,
    /// Mean of member wells' peak responses.
    pub peak_mean: f64,
    /// Sample standard deviation of the peak responses; `None` below two wells.
    pub peak_std: Option<f64>,
    /// Measured (post-dilution) concentration; `None` when the curve is
    /// degenerate.
    pub concentration: Option<f64>,
    /// Propagated concentration standard deviation.
    pub concentration_std: Option<f64>,
    /// Dilution factor carried from the condition.
    pub dilution: f64,
    /// Stock concentration: measured concentration times dilution.
    pub stock: Option<f64>,
    /// Propagated stock standard deviation.
    pub stock_std: Option<f64>,
    /// True when the measured (pre-dilution) concentration falls outside the
    /// curve's validated range.
    pub out_of_range: bool,
}

/// Quantify every condition on the plate against `curve`.
///
/// Each condition's replicate peaks are averaged, inverted through the curve,
/// and scaled by the condition's dilution factor. The range check applies to
/// the measured concentration, before dilution scaling. A degenerate curve
/// (zero slope) yields rows with the concentration fields empty rather than
/// failing the whole run.
pub fn quantify(map: &PlateMap, series: &SeriesTable, curve: &CalibrationCurve) -> Vec<QuantRow> {
    let mut rows = Vec::new();
    for condition in map.conditions() {
        let Some(peak) = condition.peak_summary(series) else {
            warn!(
                "condition {:?} has no wells in the loaded series; skipping",
                condition.name
            );
            continue;
        };

        let concentration = curve.invert(peak.mean).ok();
        let concentration_std = peak
            .std_dev
            .and_then(|std| curve.propagate_std(std).ok());
        let stock = concentration.map(|c| c * condition.dilution);
        let stock_std = concentration_std.map(|s| s * condition.dilution);
        let out_of_range = concentration.is_some_and(|c| !curve.in_range(c));

        rows.push(QuantRow {
            condition: condition.name.clone(),
            peak_mean: peak.mean,
            peak_std: peak.std_dev,
            concentration,
            concentration_std,
            dilution: condition.dilution,
            stock,
            stock_std,
            out_of_range,
        });
    }
    rows
}
