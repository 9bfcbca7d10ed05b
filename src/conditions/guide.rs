//! Guide-file ingestion: bulk condition assignment from a plate-layout table.
//!
//! A guide file mirrors the physical plate: the first row carries plate column
//! numbers, the first column (or a column literally named `Row`) carries plate
//! row letters, and each cell names the condition occupying that well with the
//! grammar `Name[@Dilution][~Concentration]`, e.g. `DrugA@2~5`.

use std::path::Path;

use log::{debug, warn};

use super::{ConditionError, PlateMap};
use crate::table::{self, Cell};
use crate::well::WellId;

/// Metadata accumulated per distinct condition name while walking the grid.
#[derive(Debug)]
struct GuideEntry {
    name: String,
    dilution: f64,
    concentration: Option<f64>,
    wells: Vec<WellId>,
}

impl GuideEntry {
    /// Merge metadata from another cell carrying the same name.
    ///
    /// Conflicts resolve first-non-default-wins: an explicit dilution (≠ 1.0)
    /// or a parsed concentration seen earlier is never overwritten by a later
    /// cell's value.
    fn absorb(&mut self, dilution: f64, concentration: Option<f64>, well: WellId) {
        if self.concentration.is_none() {
            self.concentration = concentration;
        }
        if (self.dilution - 1.0).abs() < f64::EPSILON && (dilution - 1.0).abs() >= f64::EPSILON {
            self.dilution = dilution;
        }
        self.wells.push(well);
    }
}

/// Import conditions from a guide file, assigning wells through
/// [`PlateMap::assign`] so disjointness holds. Returns the number of
/// conditions created.
pub fn load_guide(map: &mut PlateMap, path: &Path) -> Result<usize, ConditionError> {
    let rows = table::load_table(path)?;
    import_guide(map, &rows)
}

/// Import conditions from already-decoded guide rows.
pub fn import_guide(map: &mut PlateMap, rows: &[Vec<Cell>]) -> Result<usize, ConditionError> {
    let Some((header, body)) = rows.split_first() else {
        return Ok(0);
    };

    let row_column = header
        .iter()
        .position(|cell| {
            cell.as_text()
                .is_some_and(|text| text.eq_ignore_ascii_case("row"))
        })
        .unwrap_or(0);

    // Header cells holding an integer 1..=24 bind that position to a plate
    // column; everything else is ignored.
    let column_bindings: Vec<(usize, u8)> = header
        .iter()
        .enumerate()
        .filter_map(|(index, cell)| {
            let value = cell.as_number()?;
            if value.fract() == 0.0 && (1.0..=24.0).contains(&value) {
                Some((index, value as u8))
            } else {
                None
            }
        })
        .collect();
    if column_bindings.is_empty() {
        warn!("guide file header has no plate column numbers");
    }

    // Insertion-ordered so conditions are created in reading order.
    let mut entries: Vec<GuideEntry> = Vec::new();

    for row in body {
        let Some(letter) = plate_row_letter(row.get(row_column)) else {
            debug!("skipping guide row without a plate row letter");
            continue;
        };
        for (index, column) in &column_bindings {
            let Some(text) = cell_text(row.get(*index)) else {
                continue;
            };
            let Some((name, dilution, concentration)) = parse_guide_cell(&text) else {
                continue;
            };
            let Some(well) = WellId::new(letter, *column) else {
                continue;
            };

            match entries.iter_mut().find(|entry| entry.name == name) {
                Some(entry) => entry.absorb(dilution, concentration, well),
                None => entries.push(GuideEntry {
                    name,
                    dilution,
                    concentration,
                    wells: vec![well],
                }),
            }
        }
    }

    let mut created = 0;
    for entry in entries {
        if entry.wells.is_empty() {
            continue;
        }
        map.assign(&entry.name, entry.concentration, entry.dilution, entry.wells)?;
        created += 1;
    }
    Ok(created)
}

/// A guide body row labels a plate row with a single letter `A..=P`.
fn plate_row_letter(cell: Option<&Cell>) -> Option<char> {
    let text = cell?.as_text()?.trim();
    let mut chars = text.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    if chars.next().is_some() || !('A'..='P').contains(&letter) {
        return None;
    }
    Some(letter)
}

/// Text content of a guide cell; native numbers are rendered back to text so
/// purely numeric condition names survive spreadsheet typing.
fn cell_text(cell: Option<&Cell>) -> Option<String> {
    match cell? {
        Cell::Text(text) => Some(text.clone()),
        Cell::Number(value) => Some(format!("{value}")),
        Cell::Missing => None,
    }
}

/// Split `Name[@Dilution][~Concentration]` into its parts.
///
/// Malformed numeric parts fall back to their defaults (dilution 1.0, no
/// concentration) rather than failing the cell.
fn parse_guide_cell(text: &str) -> Option<(String, f64, Option<f64>)> {
    let text = text.trim();
    let (head, concentration_text) = match text.split_once('~') {
        Some((head, tail)) => (head, Some(tail)),
        None => (text, None),
    };
    let (name, dilution_text) = match head.split_once('@') {
        Some((name, tail)) => (name, Some(tail)),
        None => (head, None),
    };

    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let dilution = dilution_text
        .and_then(|t| t.trim().parse().ok())
        .unwrap_or(1.0);
    let concentration = concentration_text.and_then(|t| t.trim().parse().ok());
    Some((name.to_string(), dilution, concentration))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<Cell>> {
        data.iter()
            .map(|row| row.iter().map(|c| Cell::from_text(c)).collect())
            .collect()
    }

    fn well(id: &str) -> WellId {
        WellId::parse(id).unwrap()
    }

    #[test]
    fn cell_grammar_variants() {
        assert_eq!(
            parse_guide_cell("DrugA@2~5"),
            Some(("DrugA".to_string(), 2.0, Some(5.0)))
        );
        assert_eq!(parse_guide_cell("Control"), Some(("Control".to_string(), 1.0, None)));
        assert_eq!(
            parse_guide_cell("Std~0.5"),
            Some(("Std".to_string(), 1.0, Some(0.5)))
        );
        assert_eq!(
            parse_guide_cell("Sample@10"),
            Some(("Sample".to_string(), 10.0, None))
        );
        // Malformed numerics fall back to defaults.
        assert_eq!(
            parse_guide_cell("X@abc~def"),
            Some(("X".to_string(), 1.0, None))
        );
        assert_eq!(parse_guide_cell(""), None);
        assert_eq!(parse_guide_cell("@2~5"), None);
    }

    #[test]
    fn grid_assignment() {
        let mut map = PlateMap::new();
        let guide = rows(&[
            &["Row", "1", "2"],
            &["A", "DrugA@2~5", "DrugA@2~5"],
            &["B", "Control", ""],
        ]);
        let created = import_guide(&mut map, &guide).unwrap();
        assert_eq!(created, 2);

        let drug = &map.conditions()[0];
        assert_eq!(drug.name, "DrugA");
        assert_eq!(drug.dilution, 2.0);
        assert_eq!(drug.concentration, Some(5.0));
        assert_eq!(drug.wells, [well("A1"), well("A2")].into_iter().collect());

        let control = &map.conditions()[1];
        assert_eq!(control.name, "Control");
        assert_eq!(control.wells, [well("B1")].into_iter().collect());
    }

    #[test]
    fn first_non_default_metadata_wins() {
        let mut map = PlateMap::new();
        let guide = rows(&[
            &["Row", "1", "2", "3"],
            &["A", "X", "X@4~2", "X@8~9"],
        ]);
        import_guide(&mut map, &guide).unwrap();
        let x = &map.conditions()[0];
        // The first explicit dilution and the first parsed concentration stick.
        assert_eq!(x.dilution, 4.0);
        assert_eq!(x.concentration, Some(2.0));
        assert_eq!(x.wells.len(), 3);
    }

    #[test]
    fn non_letter_rows_and_unbound_columns_are_skipped() {
        let mut map = PlateMap::new();
        let guide = rows(&[
            &["Row", "1", "notes", "25"],
            &["A", "Drug", "ignored", "ignored"],
            &["Totals", "Drug", "", ""],
        ]);
        let created = import_guide(&mut map, &guide).unwrap();
        assert_eq!(created, 1);
        assert_eq!(map.conditions()[0].wells, [well("A1")].into_iter().collect());
    }

    #[test]
    fn row_letter_from_first_column_when_unnamed() {
        let mut map = PlateMap::new();
        let guide = rows(&[&["", "1"], &["B", "Thing"]]);
        import_guide(&mut map, &guide).unwrap();
        assert_eq!(map.conditions()[0].wells, [well("B1")].into_iter().collect());
    }

    #[test]
    fn import_steals_wells_from_existing_conditions() {
        let mut map = PlateMap::new();
        map.assign("Old", None, 1.0, [well("A1"), well("A2")]).unwrap();
        let guide = rows(&[&["Row", "1"], &["A", "New"]]);
        import_guide(&mut map, &guide).unwrap();

        let names: Vec<&str> = map.conditions().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Old", "New"]);
        assert_eq!(map.conditions()[0].wells, [well("A2")].into_iter().collect());
        assert_eq!(map.conditions()[1].wells, [well("A1")].into_iter().collect());
    }
}
