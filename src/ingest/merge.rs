//! Merging scanned blocks into one canonical series table.

use std::collections::{BTreeSet, HashSet};

use super::blocks::RawBlock;
use crate::series::SeriesTable;
use crate::well::WellId;

/// Combine all blocks into a single time-indexed well matrix.
///
/// Rows are gathered in encounter order; when two rows share a timestamp
/// (duplicate or overlapping exports) the first-encountered row wins and later
/// duplicates are discarded. This policy is observable behavior and must not
/// be replaced by averaging or last-wins. The result is sorted ascending by
/// time, with columns being the union of all wells seen across blocks.
pub(crate) fn merge_blocks(blocks: &[RawBlock]) -> SeriesTable {
    let well_set: BTreeSet<WellId> = blocks
        .iter()
        .flat_map(|block| block.columns.iter().map(|(_, well)| *well))
        .collect();
    let wells: Vec<WellId> = well_set.into_iter().collect();

    let mut seen = HashSet::new();
    let mut rows: Vec<(f64, Vec<Option<f64>>)> = Vec::new();

    for block in blocks {
        for row in &block.rows {
            // First-seen wins per distinct timestamp.
            if !seen.insert(row.time.to_bits()) {
                continue;
            }
            let mut values = vec![None; wells.len()];
            for ((_, well), reading) in block.columns.iter().zip(&row.readings) {
                if let Ok(index) = wells.binary_search(well) {
                    values[index] = *reading;
                }
            }
            rows.push((row.time, values));
        }
    }

    rows.sort_by(|a, b| a.0.total_cmp(&b.0));
    let (times, values) = rows.into_iter().unzip();
    SeriesTable::new(times, wells, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::blocks::scan_blocks;
    use crate::table::Cell;

    fn rows(data: &[&[&str]]) -> Vec<Vec<Cell>> {
        data.iter()
            .map(|row| row.iter().map(|c| Cell::from_text(c)).collect())
            .collect()
    }

    fn well(id: &str) -> WellId {
        WellId::parse(id).unwrap()
    }

    #[test]
    fn duplicate_timestamps_keep_first_row() {
        let table = rows(&[
            &["", "Time", "A1"],
            &["", "0:00", "10"],
            &["", "0:01", "15"],
            &["", "", ""],
            &["", "Time", "A1"],
            &["", "0:01", "999"],
            &["", "0:02", "30"],
        ]);
        let merged = merge_blocks(&scan_blocks(&table));
        assert_eq!(merged.times(), &[0.0, 1.0, 2.0]);
        assert_eq!(merged.reading(1, well("A1")), Some(15.0));
        assert_eq!(merged.reading(2, well("A1")), Some(30.0));
    }

    #[test]
    fn merging_a_block_twice_is_idempotent() {
        let table = rows(&[&["", "Time", "A1"], &["", "0:00", "10"], &["", "0:01", "15"]]);
        let blocks_once = scan_blocks(&table);
        let once = merge_blocks(&blocks_once);

        let mut doubled = rows(&[&["", "Time", "A1"], &["", "0:00", "10"], &["", "0:01", "15"]]);
        doubled.push(vec![Cell::Missing]);
        doubled.extend(rows(&[
            &["", "Time", "A1"],
            &["", "0:00", "10"],
            &["", "0:01", "15"],
        ]));
        let twice = merge_blocks(&scan_blocks(&doubled));

        assert_eq!(once, twice);
    }

    #[test]
    fn columns_are_the_union_across_blocks() {
        let table = rows(&[
            &["", "Time", "A1"],
            &["", "0:00", "10"],
            &["", "", ""],
            &["", "Time", "B1"],
            &["", "0:05", "99"],
        ]);
        let merged = merge_blocks(&scan_blocks(&table));
        assert_eq!(merged.wells(), &[well("A1"), well("B1")]);
        // Wells absent from a row's source block are missing for that row.
        assert_eq!(merged.reading(0, well("B1")), None);
        assert_eq!(merged.reading(1, well("A1")), None);
        assert_eq!(merged.reading(1, well("B1")), Some(99.0));
    }

    #[test]
    fn out_of_order_blocks_sort_ascending() {
        let table = rows(&[
            &["", "Time", "A1"],
            &["", "0:05", "50"],
            &["", "", ""],
            &["", "Time", "A1"],
            &["", "0:01", "10"],
        ]);
        let merged = merge_blocks(&scan_blocks(&table));
        assert_eq!(merged.times(), &[1.0, 5.0]);
    }
}
