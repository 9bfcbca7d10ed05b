//! Well-grid addressing for 96- and 384-well plates.

use std::fmt;

/// A validated well identifier: row letter `A..=P` plus column `1..=24`.
///
/// Ordering is row-major (`A1 < A2 < ... < B1`), which keeps series columns
/// and exports deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WellId {
    /// 0-based row index (`A` = 0).
    row: u8,
    /// 1-based column number.
    col: u8,
}

impl WellId {
    /// Build a well from a row letter (`A..=P`) and a column number (`1..=24`).
    ///
    /// Returns `None` when either part is outside the 384-well grid.
    pub fn new(row_letter: char, column: u8) -> Option<Self> {
        if !row_letter.is_ascii_uppercase() || row_letter > 'P' {
            return None;
        }
        if !(1..=24).contains(&column) {
            return None;
        }
        Some(Self {
            row: row_letter as u8 - b'A',
            col: column,
        })
    }

    /// Parse a well identifier matching the grammar `[A-P][1-24]`.
    ///
    /// Anything else yields `None`. Callers treat a non-match as "not a well
    /// column" rather than an error, since stray header text is expected in
    /// reader exports.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let mut chars = text.chars();
        let letter = chars.next()?;
        let digits = chars.as_str();
        if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Self::new(letter, digits.parse().ok()?)
    }

    /// Row letter (`A..=P`).
    pub fn row_letter(&self) -> char {
        (b'A' + self.row) as char
    }

    /// 1-based column number.
    pub fn column(&self) -> u8 {
        self.col
    }
}

impl fmt::Display for WellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row_letter(), self.col)
    }
}

/// Physical plate layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlateFormat {
    /// 96-well plate: rows `A..=H`, columns `1..=12`.
    Well96,
    /// 384-well plate: rows `A..=P`, columns `1..=24`.
    Well384,
}

impl PlateFormat {
    /// Grid dimensions as `(rows, columns)`.
    pub fn dimensions(&self) -> (usize, usize) {
        match self {
            PlateFormat::Well96 => (8, 12),
            PlateFormat::Well384 => (16, 24),
        }
    }

    /// Classify a dataset from its observed wells.
    ///
    /// 384-well iff any well has a row letter beyond `H` or a column beyond
    /// 12; otherwise 96-well. Callers pass the wells that actually carry data.
    pub fn detect<'a>(wells: impl IntoIterator<Item = &'a WellId>) -> Self {
        for well in wells {
            if well.row_letter() > 'H' || well.column() > 12 {
                return PlateFormat::Well384;
            }
        }
        PlateFormat::Well96
    }

    /// True when the well falls inside this layout's grid.
    pub fn contains(&self, well: &WellId) -> bool {
        let (rows, cols) = self.dimensions();
        usize::from(well.row) < rows && usize::from(well.col) <= cols
    }
}

impl fmt::Display for PlateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlateFormat::Well96 => write!(f, "96-Well"),
            PlateFormat::Well384 => write!(f, "384-Well"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_grid_wells() {
        assert_eq!(WellId::parse("A1"), WellId::new('A', 1));
        assert_eq!(WellId::parse("H12"), WellId::new('H', 12));
        assert_eq!(WellId::parse("P24"), WellId::new('P', 24));
        assert_eq!(WellId::parse(" B7 "), WellId::new('B', 7));
    }

    #[test]
    fn parse_rejects_non_wells() {
        assert_eq!(WellId::parse(""), None);
        assert_eq!(WellId::parse("Time"), None);
        assert_eq!(WellId::parse("A0"), None);
        assert_eq!(WellId::parse("A25"), None);
        assert_eq!(WellId::parse("Q1"), None);
        assert_eq!(WellId::parse("a1"), None);
        assert_eq!(WellId::parse("1A"), None);
        assert_eq!(WellId::parse("A1.5"), None);
        assert_eq!(WellId::parse("A123"), None);
    }

    #[test]
    fn ordering_is_row_major() {
        let a1 = WellId::parse("A1").unwrap();
        let a2 = WellId::parse("A2").unwrap();
        let b1 = WellId::parse("B1").unwrap();
        assert!(a1 < a2);
        assert!(a2 < b1);
    }

    #[test]
    fn display_round_trips() {
        for id in ["A1", "H12", "P24"] {
            assert_eq!(WellId::parse(id).unwrap().to_string(), id);
        }
    }

    #[test]
    fn format_dimensions() {
        assert_eq!(PlateFormat::Well96.dimensions(), (8, 12));
        assert_eq!(PlateFormat::Well384.dimensions(), (16, 24));
    }

    #[test]
    fn detect_prefers_96_until_proven_otherwise() {
        let small = [WellId::parse("A1").unwrap(), WellId::parse("H12").unwrap()];
        assert_eq!(PlateFormat::detect(&small), PlateFormat::Well96);

        let deep_row = [WellId::parse("I3").unwrap()];
        assert_eq!(PlateFormat::detect(&deep_row), PlateFormat::Well384);

        let wide_col = [WellId::parse("A13").unwrap()];
        assert_eq!(PlateFormat::detect(&wide_col), PlateFormat::Well384);

        assert_eq!(PlateFormat::detect([].iter()), PlateFormat::Well96);
    }

    #[test]
    fn contains_respects_layout() {
        let i1 = WellId::parse("I1").unwrap();
        assert!(!PlateFormat::Well96.contains(&i1));
        assert!(PlateFormat::Well384.contains(&i1));
    }
}
