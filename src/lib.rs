//! # lumiquant - Plate-Reader Luminescence Quantification
//!
//! `lumiquant` reconstructs clean per-well time series from the irregular,
//! multi-block export files produced by microplate luminescence readers, and
//! converts well-level signal into analyte concentration via a linear standard
//! curve with first-order error propagation and out-of-range alerting.
//!
//! ## Key Features
//!
//! - **Block-tolerant ingestion**: reader exports often contain several
//!   redundant or partial data blocks, mixed time encodings (`H:MM:SS`,
//!   `MM:SS`, bare minutes), and non-well columns. The scanner recovers every
//!   block and merges them into one ascending, duplicate-free series table.
//!
//! - **Replicate aggregation**: wells are grouped into named conditions (with
//!   optional known concentration and dilution factor) and summarized as
//!   per-time mean/standard-deviation traces and whole-series peak responses.
//!
//! - **Linear calibration**: ordinary least-squares fit over standards,
//!   inversion of measured response back to concentration, error propagation
//!   through the inversion, and alerting against a validated assay range.
//!
//! - **CSV and spreadsheet input**: delimited text via `csv`, `.xlsx`/`.xls`
//!   via `calamine` (behind the default `xlsx` feature).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lumiquant::calibration::CalibrationCurve;
//! use lumiquant::conditions::{guide, PlateMap};
//! use lumiquant::ingest;
//! use lumiquant::quant;
//!
//! // Recover the per-well time series from a reader export.
//! let series = ingest::load_series("export.csv".as_ref())?;
//!
//! // Group replicate wells into conditions from a plate guide file.
//! let mut map = PlateMap::new();
//! guide::load_guide(&mut map, "guide.csv".as_ref())?;
//!
//! // Quantify peak responses against a standard curve.
//! let curve = CalibrationCurve::new(100.0, 0.0).with_range(Some(0.1), Some(10.0));
//! for row in quant::quantify(&map, &series, &curve) {
//!     println!("{}: {:?} ug/mL", row.condition, row.concentration);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`well`]: validated well identifiers and plate-format detection
//! - [`table`]: loosely-typed cell decoding for CSV and spreadsheet input
//! - [`ingest`]: block scanner and series merger
//! - [`series`]: the canonical time-by-well reading matrix
//! - [`conditions`]: replicate grouping, guide-file import, descriptive stats
//! - [`calibration`]: line fitting, inversion, presets, range checks
//! - [`quant`]: per-condition quantification rows
//! - [`export`]: CSV outputs for downstream plotting and reporting

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod calibration;
pub mod conditions;
pub mod export;
pub mod ingest;
pub mod quant;
pub mod series;
pub mod table;
pub mod well;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::calibration::{
        CalibrationCurve, CalibrationError, CurvePreset, FittedLine, PresetStore,
    };
    pub use crate::conditions::{Condition, ConditionError, ConditionTrace, PeakSummary, PlateMap};
    pub use crate::ingest::{load_series, parse_minutes, parse_rows, IngestError};
    pub use crate::quant::{quantify, QuantRow};
    pub use crate::series::SeriesTable;
    pub use crate::table::{load_table, Cell, TableError};
    pub use crate::well::{PlateFormat, WellId};
}
