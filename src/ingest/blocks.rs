//! Cursor-driven scan for embedded time-series blocks.
//!
//! Reader exports frequently concatenate several partial or repeated table
//! fragments into one file. Each fragment ("block") is a header row binding
//! columns to well identifiers, followed by contiguous data rows. The scanner
//! walks the decoded cell rows with a plain index cursor, emitting one
//! [`RawBlock`] per fragment and resuming immediately after it.

use log::debug;

use super::time;
use crate::table::Cell;
use crate::well::WellId;

/// One parsed table fragment, discarded once merged.
#[derive(Debug)]
pub(crate) struct RawBlock {
    /// Header bindings: cell position to well identifier.
    pub columns: Vec<(usize, WellId)>,
    pub rows: Vec<BlockRow>,
}

/// A single data row within a block, readings parallel to `columns`.
#[derive(Debug)]
pub(crate) struct BlockRow {
    pub time: f64,
    pub readings: Vec<Option<f64>>,
}

/// Scan all rows for time-series blocks.
pub(crate) fn scan_blocks(rows: &[Vec<Cell>]) -> Vec<RawBlock> {
    let mut blocks = Vec::new();
    let mut cursor = 0;

    while cursor < rows.len() {
        match header_bindings(&rows[cursor]) {
            Some(columns) => {
                let (data_rows, next) = consume_data_rows(rows, cursor + 1, &columns);
                debug!(
                    "block at row {cursor}: {} well columns, {} data rows",
                    columns.len(),
                    data_rows.len()
                );
                if !data_rows.is_empty() {
                    blocks.push(RawBlock {
                        columns,
                        rows: data_rows,
                    });
                }
                cursor = next;
            }
            None => cursor += 1,
        }
    }

    blocks
}

/// A row is a block header iff its second cell contains "time"
/// (case-insensitive) and at least one cell parses as a well identifier.
///
/// The well requirement guards against stray "Time" labels in surrounding
/// metadata; those rows are skipped, not treated as empty headers.
fn header_bindings(row: &[Cell]) -> Option<Vec<(usize, WellId)>> {
    let time_label = row.get(1)?.as_text()?;
    if !time_label.to_lowercase().contains("time") {
        return None;
    }

    let columns: Vec<(usize, WellId)> = row
        .iter()
        .enumerate()
        .filter_map(|(index, cell)| Some((index, WellId::parse(cell.as_text()?)?)))
        .collect();

    if columns.is_empty() {
        debug!("skipping 'Time' row without well columns");
        return None;
    }
    Some(columns)
}

/// Consume data rows from `start` until the block terminates; returns the
/// rows and the cursor position to resume scanning from.
///
/// Termination: a row shorter than two cells, a blank second cell, or a
/// second cell that fails time parsing (the malformed row is excluded rather
/// than aborting the file). Unparseable readings are recorded missing.
fn consume_data_rows(
    rows: &[Vec<Cell>],
    start: usize,
    columns: &[(usize, WellId)],
) -> (Vec<BlockRow>, usize) {
    let mut out = Vec::new();
    let mut cursor = start;

    while cursor < rows.len() {
        let row = &rows[cursor];
        if row.len() < 2 || row[1].is_empty() {
            break;
        }
        let Some(time) = time::parse_minutes(&row[1]) else {
            debug!("unparseable time at row {cursor} terminates block");
            break;
        };

        let readings = columns
            .iter()
            .map(|(index, _)| row.get(*index).and_then(Cell::as_number))
            .collect();
        out.push(BlockRow { time, readings });
        cursor += 1;
    }

    (out, cursor)
}
