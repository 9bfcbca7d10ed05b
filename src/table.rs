//! Decoded tabular input: rows of loosely-typed cells from CSV or spreadsheet
//! files.
//!
//! A cell's interpretation is decided once, at load time, into the [`Cell`]
//! variant; downstream code never re-inspects raw strings. This keeps the
//! block scanner and the guide-file importer agnostic of the container format.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Errors raised while decoding an input container into cell rows.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// I/O error while opening or reading the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed delimited text.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet container error.
    #[cfg(feature = "xlsx")]
    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] calamine::Error),

    /// Spreadsheet with no worksheets.
    #[cfg(feature = "xlsx")]
    #[error("no worksheets found in {0}")]
    NoWorksheet(String),

    /// File extension requires a feature that was not compiled in.
    #[error("unsupported input format {0:?} (rebuild with the `xlsx` feature for spreadsheets)")]
    UnsupportedFormat(String),
}

/// One table cell, classified once at load time.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Blank or unreadable cell.
    Missing,
    /// Numeric value, either a native spreadsheet number or numeric-looking text.
    Number(f64),
    /// Non-numeric, non-empty text (trimmed).
    Text(String),
}

impl Cell {
    /// Classify a raw text cell: blank becomes [`Cell::Missing`], numeric text
    /// becomes [`Cell::Number`], anything else is kept as trimmed text.
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(value) => Cell::Number(value),
            Err(_) => Cell::Text(trimmed.to_string()),
        }
    }

    /// Numeric reading, if this cell holds one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Text content, if this cell holds any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(text) => Some(text),
            _ => None,
        }
    }

    /// True for blank cells.
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

/// Load a tabular file into cell rows, dispatching on the file extension:
/// `.xlsx`/`.xls` are read as spreadsheets, everything else as delimited text.
pub fn load_table(path: &Path) -> Result<Vec<Vec<Cell>>, TableError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("xlsx" | "xls") => load_spreadsheet(path),
        _ => {
            let file = File::open(path)?;
            read_delimited(BufReader::new(file))
        }
    }
}

#[cfg(not(feature = "xlsx"))]
fn load_spreadsheet(path: &Path) -> Result<Vec<Vec<Cell>>, TableError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("xlsx");
    Err(TableError::UnsupportedFormat(extension.to_string()))
}

/// Decode delimited text (CSV or CSV-like `.txt`) into cell rows.
///
/// Records may have ragged lengths; the `csv` crate strips a UTF-8 BOM
/// transparently.
pub fn read_delimited<R: Read>(reader: R) -> Result<Vec<Vec<Cell>>, TableError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::from_text).collect());
    }
    Ok(rows)
}

/// Read the first worksheet of an `.xlsx`/`.xls` workbook into cell rows.
#[cfg(feature = "xlsx")]
pub fn load_spreadsheet(path: &Path) -> Result<Vec<Vec<Cell>>, TableError> {
    use calamine::{open_workbook_auto, Reader};

    let mut workbook = open_workbook_auto(path)?;
    let sheet_name = workbook
        .sheet_names()
        .into_iter()
        .next()
        .ok_or_else(|| TableError::NoWorksheet(path.display().to_string()))?;
    let worksheet = workbook.worksheet_range(&sheet_name)?;

    Ok(worksheet
        .rows()
        .map(|row| row.iter().map(cell_from_sheet).collect())
        .collect())
}

#[cfg(feature = "xlsx")]
fn cell_from_sheet(data: &calamine::Data) -> Cell {
    use calamine::Data;

    match data {
        Data::Empty | Data::Error(_) => Cell::Missing,
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Float(value) => Cell::Number(*value),
        Data::Bool(value) => Cell::Text(value.to_string()),
        // Native time cells arrive as serial days; normalize to minutes so the
        // time parser sees the same unit as a bare numeric cell.
        Data::DateTime(dt) => Cell::Number(dt.as_f64() * 24.0 * 60.0),
        Data::String(text) => Cell::from_text(text),
        Data::DateTimeIso(text) | Data::DurationIso(text) => Cell::from_text(text),
    }
}
