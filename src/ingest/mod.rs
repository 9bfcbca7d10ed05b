//! Ingestion of raw reader exports into a [`SeriesTable`].
//!
//! The pipeline is container decoding ([`crate::table`]) → block scanning
//! ([`blocks`]) → merging ([`merge`]). A failed load never touches prior
//! session state: the caller keeps whatever table it already had.

mod blocks;
mod merge;
mod time;

use std::path::Path;

use crate::series::SeriesTable;
use crate::table::{self, Cell, TableError};

pub use time::parse_minutes;

/// Errors surfaced by a file import.
// Manual Display/Error impls: thiserror's derive treats any field named
// `source` as the error source, which a plain String cannot be.
#[derive(Debug)]
pub enum IngestError {
    /// The input container could not be decoded into rows.
    Table(TableError),

    /// The scan found no recognizable time-series block.
    NoDataFound {
        /// Human-readable description of the input (usually the file path).
        source: String,
    },
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::Table(err) => std::fmt::Display::fmt(err, f),
            IngestError::NoDataFound { source } => write!(
                f,
                "no valid data blocks found in {source}: ensure the file contains 'Time' in the \
                 second column (column B) followed by well IDs"
            ),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Table(err) => err.source(),
            IngestError::NoDataFound { .. } => None,
        }
    }
}

impl From<TableError> for IngestError {
    fn from(err: TableError) -> Self {
        IngestError::Table(err)
    }
}

/// Load a reader export file and reconstruct its per-well time series.
pub fn load_series(path: &Path) -> Result<SeriesTable, IngestError> {
    let rows = table::load_table(path)?;
    parse_rows(&rows, &path.display().to_string())
}

/// Reconstruct a series table from already-decoded cell rows.
///
/// `source` labels the input in the [`IngestError::NoDataFound`] message.
pub fn parse_rows(rows: &[Vec<Cell>], source: &str) -> Result<SeriesTable, IngestError> {
    let found = blocks::scan_blocks(rows);
    if found.is_empty() {
        return Err(IngestError::NoDataFound {
            source: source.to_string(),
        });
    }
    log::info!("merged {} block(s) from {source}", found.len());
    Ok(merge::merge_blocks(&found))
}
