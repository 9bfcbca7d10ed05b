//! The canonical per-well time series recovered from a reader export.

use crate::well::WellId;

/// A dense time-by-well reading matrix.
///
/// Invariants: time points are ascending and unique; columns are restricted to
/// validated well identifiers; there is exactly one entry (a reading or
/// missing) per `(time, well)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesTable {
    times: Vec<f64>,
    wells: Vec<WellId>,
    /// Row-major: `values[time_index][well_index]`.
    values: Vec<Vec<Option<f64>>>,
}

impl SeriesTable {
    pub(crate) fn new(times: Vec<f64>, wells: Vec<WellId>, values: Vec<Vec<Option<f64>>>) -> Self {
        debug_assert_eq!(times.len(), values.len());
        debug_assert!(values.iter().all(|row| row.len() == wells.len()));
        debug_assert!(times.windows(2).all(|pair| pair[0] < pair[1]));
        Self {
            times,
            wells,
            values,
        }
    }

    /// Ascending, unique time points in minutes.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Well columns in row-major well order.
    pub fn wells(&self) -> &[WellId] {
        &self.wells
    }

    /// Number of time points.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// True when the table holds no time points.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    fn well_index(&self, well: WellId) -> Option<usize> {
        self.wells.binary_search(&well).ok()
    }

    /// True when the well appears as a column (with or without data).
    pub fn has_column(&self, well: WellId) -> bool {
        self.well_index(well).is_some()
    }

    /// Reading at a time index for a well, if present and non-missing.
    pub fn reading(&self, time_index: usize, well: WellId) -> Option<f64> {
        let col = self.well_index(well)?;
        self.values.get(time_index)?.get(col).copied().flatten()
    }

    /// Full column for a well, one entry per time point.
    pub fn column(&self, well: WellId) -> Option<Vec<Option<f64>>> {
        let col = self.well_index(well)?;
        Some(self.values.iter().map(|row| row[col]).collect())
    }

    /// Wells that carry at least one non-missing reading.
    ///
    /// Wells with zero readings are reported excluded by the presentation
    /// layer and ignored by plate-format detection.
    pub fn wells_with_data(&self) -> Vec<WellId> {
        self.wells
            .iter()
            .enumerate()
            .filter(|(col, _)| self.values.iter().any(|row| row[*col].is_some()))
            .map(|(_, well)| *well)
            .collect()
    }

    /// Maximum non-missing reading across the whole series for a well.
    ///
    /// This is the "peak response" used for calibration and quantification;
    /// it is deliberately not tied to any fixed time point.
    pub fn well_peak(&self, well: WellId) -> Option<f64> {
        let col = self.well_index(well)?;
        self.values
            .iter()
            .filter_map(|row| row[col])
            .fold(None, |peak, value| {
                Some(match peak {
                    Some(current) if current >= value => current,
                    _ => value,
                })
            })
    }
}
