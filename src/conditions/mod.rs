//! Replicate grouping: named conditions over disjoint well sets, with
//! descriptive statistics across member wells.

pub mod guide;

use std::collections::BTreeSet;

use crate::series::SeriesTable;
use crate::table::TableError;
use crate::well::WellId;

/// Display palette cycled through as conditions are created.
pub(crate) const PALETTE: [&str; 20] = [
    "#2563eb", "#dc2626", "#16a34a", "#d97706", "#9333ea", "#db2777", "#0891b2", "#84cc16",
    "#4b5563", "#000000", "#e11d48", "#059669", "#7c3aed", "#ea580c", "#0284c7", "#65a30d",
    "#be123c", "#4f46e5", "#b45309", "#334155",
];

/// Errors raised by condition edits and guide-file imports.
///
/// Validation happens before any mutation: a failed edit leaves the condition
/// list exactly as it was.
#[derive(Debug, thiserror::Error)]
pub enum ConditionError {
    /// Condition name was blank.
    #[error("condition name cannot be empty")]
    EmptyName,

    /// No wells were selected for the condition.
    #[error("condition must cover at least one well")]
    EmptySelection,

    /// User-supplied concentration or dilution text was non-numeric.
    #[error("invalid {field}: {value:?} is not a number")]
    InvalidInput {
        /// Which input failed ("concentration" or "dilution factor").
        field: &'static str,
        /// The offending text.
        value: String,
    },

    /// Edit referenced a condition that no longer exists.
    #[error("no condition with id {0:?}")]
    UnknownCondition(String),

    /// Guide file could not be decoded.
    #[error(transparent)]
    Table(#[from] TableError),
}

/// A named grouping of replicate wells.
#[derive(Debug, Clone)]
pub struct Condition {
    /// Stable identifier, unique within a [`PlateMap`].
    pub id: String,
    /// Display name.
    pub name: String,
    /// Member wells; disjoint from every other condition's set by construction.
    pub wells: BTreeSet<WellId>,
    /// Known analyte concentration, when this condition is a standard.
    pub concentration: Option<f64>,
    /// Dilution factor applied before measurement.
    pub dilution: f64,
    /// Display color (hex).
    pub color: String,
}

/// Per-condition kinetic trace: mean and standard deviation at each time point.
#[derive(Debug, Clone)]
pub struct ConditionTrace {
    /// Condition display name.
    pub name: String,
    /// Display color (hex).
    pub color: String,
    /// Mean across member wells per time point; `None` when every member
    /// reading is missing at that time.
    pub mean: Vec<Option<f64>>,
    /// Sample standard deviation per time point; `None` below two readings.
    pub std_dev: Vec<Option<f64>>,
}

/// Scalar peak-response summary across a condition's member wells.
#[derive(Debug, Clone, Copy)]
pub struct PeakSummary {
    /// Mean of each member well's whole-series maximum.
    pub mean: f64,
    /// Sample standard deviation across the per-well maxima; `None` below two
    /// wells.
    pub std_dev: Option<f64>,
    /// Number of wells that contributed a maximum.
    pub replicates: usize,
}

impl Condition {
    /// Member wells that actually appear as series columns.
    pub fn resolvable_wells(&self, series: &SeriesTable) -> Vec<WellId> {
        self.wells
            .iter()
            .copied()
            .filter(|well| series.has_column(*well))
            .collect()
    }

    /// Per-time mean and standard deviation across member wells.
    ///
    /// Returns `None` when no member well resolves to a series column; a
    /// condition pointing entirely at absent wells contributes nothing rather
    /// than erroring.
    pub fn kinetic_summary(&self, series: &SeriesTable) -> Option<ConditionTrace> {
        let wells = self.resolvable_wells(series);
        if wells.is_empty() {
            return None;
        }

        let mut mean = Vec::with_capacity(series.len());
        let mut std_dev = Vec::with_capacity(series.len());
        for time_index in 0..series.len() {
            let readings: Vec<f64> = wells
                .iter()
                .filter_map(|well| series.reading(time_index, *well))
                .collect();
            let (m, s) = mean_and_std(&readings);
            mean.push(m);
            std_dev.push(s);
        }

        Some(ConditionTrace {
            name: self.name.clone(),
            color: self.color.clone(),
            mean,
            std_dev,
        })
    }

    /// Peak-response summary: mean and standard deviation of each member
    /// well's maximum reading across the whole time series.
    pub fn peak_summary(&self, series: &SeriesTable) -> Option<PeakSummary> {
        let maxima: Vec<f64> = self
            .resolvable_wells(series)
            .iter()
            .filter_map(|well| series.well_peak(*well))
            .collect();
        let (mean, std_dev) = mean_and_std(&maxima);
        Some(PeakSummary {
            mean: mean?,
            std_dev,
            replicates: maxima.len(),
        })
    }
}

/// Mean and sample (n-1) standard deviation, skipping nothing: callers filter
/// missing readings first.
fn mean_and_std(values: &[f64]) -> (Option<f64>, Option<f64>) {
    if values.is_empty() {
        return (None, None);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return (Some(mean), None);
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (Some(mean), Some(variance.sqrt()))
}

/// The session's condition collection.
///
/// Maintains the invariant that condition well sets are pairwise disjoint and
/// that no condition is ever left empty: every mutation strips incoming wells
/// from all other owners and prunes emptied conditions before returning.
#[derive(Debug, Default)]
pub struct PlateMap {
    conditions: Vec<Condition>,
    color_cursor: usize,
    // Monotonic so ids stay unique across deletions.
    id_cursor: usize,
}

impl PlateMap {
    /// Create an empty condition collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Conditions in creation order.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Look up a condition by id.
    pub fn get(&self, id: &str) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.id == id)
    }

    fn next_color(&mut self) -> String {
        let color = PALETTE[self.color_cursor % PALETTE.len()];
        self.color_cursor += 1;
        color.to_string()
    }

    /// Remove `wells` from every condition except the one at `keep`, then
    /// drop conditions left empty. Part of every mutation so the disjointness
    /// invariant holds at all observable points.
    fn steal_wells(&mut self, wells: &BTreeSet<WellId>, keep: Option<usize>) {
        for (index, condition) in self.conditions.iter_mut().enumerate() {
            if Some(index) != keep {
                condition.wells.retain(|well| !wells.contains(well));
            }
        }
        self.conditions.retain(|c| !c.wells.is_empty());
    }

    /// Create a condition owning `wells`, stealing them from any previous
    /// owner as one logical step.
    ///
    /// Returns the new condition's id.
    pub fn assign(
        &mut self,
        name: &str,
        concentration: Option<f64>,
        dilution: f64,
        wells: impl IntoIterator<Item = WellId>,
    ) -> Result<String, ConditionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConditionError::EmptyName);
        }
        let wells: BTreeSet<WellId> = wells.into_iter().collect();
        if wells.is_empty() {
            return Err(ConditionError::EmptySelection);
        }

        self.steal_wells(&wells, None);
        let id = format!("{name}_{}", self.id_cursor);
        self.id_cursor += 1;
        let color = self.next_color();
        self.conditions.push(Condition {
            id: id.clone(),
            name: name.to_string(),
            wells,
            concentration,
            dilution,
            color,
        });
        Ok(id)
    }

    /// Like [`PlateMap::assign`] but with concentration and dilution supplied
    /// as user-entered text, validated before any mutation.
    pub fn assign_parsed(
        &mut self,
        name: &str,
        concentration: &str,
        dilution: &str,
        wells: impl IntoIterator<Item = WellId>,
    ) -> Result<String, ConditionError> {
        let concentration = parse_concentration(concentration)?;
        let dilution = parse_dilution(dilution)?;
        self.assign(name, concentration, dilution, wells)
    }

    /// Rewrite an existing condition in place, stealing any newly claimed
    /// wells from other conditions.
    pub fn update(
        &mut self,
        id: &str,
        name: &str,
        concentration: Option<f64>,
        dilution: f64,
        wells: impl IntoIterator<Item = WellId>,
    ) -> Result<(), ConditionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConditionError::EmptyName);
        }
        let wells: BTreeSet<WellId> = wells.into_iter().collect();
        if wells.is_empty() {
            return Err(ConditionError::EmptySelection);
        }
        let index = self
            .conditions
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| ConditionError::UnknownCondition(id.to_string()))?;

        self.steal_wells(&wells, Some(index));
        // steal_wells may prune conditions before `index`; relocate by id.
        if let Some(condition) = self.conditions.iter_mut().find(|c| c.id == id) {
            condition.name = name.to_string();
            condition.concentration = concentration;
            condition.dilution = dilution;
            condition.wells = wells;
        }
        Ok(())
    }

    /// Delete a condition, releasing its wells back to the unassigned pool.
    ///
    /// Returns `true` when a condition was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.conditions.len();
        self.conditions.retain(|c| c.id != id);
        self.conditions.len() != before
    }

    /// Kinetic summaries for every condition with resolvable wells.
    pub fn kinetic_summaries(&self, series: &SeriesTable) -> Vec<ConditionTrace> {
        self.conditions
            .iter()
            .filter_map(|condition| condition.kinetic_summary(series))
            .collect()
    }

    /// `(concentration, mean peak response)` pairs from conditions carrying a
    /// known concentration, the input to a standard-curve fit.
    pub fn standard_points(&self, series: &SeriesTable) -> Vec<(f64, f64)> {
        self.conditions
            .iter()
            .filter_map(|condition| {
                let concentration = condition.concentration?;
                let peak = condition.peak_summary(series)?;
                Some((concentration, peak.mean))
            })
            .collect()
    }
}

/// Parse optional user-entered concentration text; blank means "no known
/// concentration".
pub fn parse_concentration(text: &str) -> Result<Option<f64>, ConditionError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse()
        .map(Some)
        .map_err(|_| ConditionError::InvalidInput {
            field: "concentration",
            value: text.to_string(),
        })
}

/// Parse optional user-entered dilution text; blank means the default 1.0.
pub fn parse_dilution(text: &str) -> Result<f64, ConditionError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(1.0);
    }
    text.parse().map_err(|_| ConditionError::InvalidInput {
        field: "dilution factor",
        value: text.to_string(),
    })
}
