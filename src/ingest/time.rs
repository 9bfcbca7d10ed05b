//! Normalization of heterogeneous time encodings to minute offsets.

use crate::table::Cell;

/// Parse a time cell into a minute offset.
///
/// Accepted encodings: `H:MM:SS` (`0:01:30` → 1.5), two-part clock strings
/// (`1:30` → 90.0), and bare minute counts (`45` → 45.0, including native
/// numeric cells). The result must be finite and non-negative; anything else
/// yields `None`.
pub fn parse_minutes(cell: &Cell) -> Option<f64> {
    let minutes = match cell {
        Cell::Number(value) => *value,
        Cell::Text(text) => parse_clock(text)?,
        Cell::Missing => return None,
    };
    (minutes.is_finite() && minutes >= 0.0).then_some(minutes)
}

fn parse_clock(text: &str) -> Option<f64> {
    let text = text.trim();
    if !text.contains(':') {
        return text.parse().ok();
    }
    let parts = text
        .split(':')
        .map(|part| part.trim().parse::<f64>().ok())
        .collect::<Option<Vec<f64>>>()?;
    match parts.as_slice() {
        [hours, minutes, seconds] => Some(hours * 60.0 + minutes + seconds / 60.0),
        [head, tail] => Some(head * 60.0 + tail),
        _ => None,
    }
}
