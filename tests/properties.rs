//! Property-based tests over ingestion and calibration.

use lumiquant::calibration::CalibrationCurve;
use lumiquant::ingest::{parse_minutes, parse_rows};
use lumiquant::table::Cell;
use proptest::prelude::*;

fn block_rows(times: &[u32], readings: &[f64]) -> Vec<Vec<Cell>> {
    let mut rows = vec![vec![
        Cell::Missing,
        Cell::from_text("Time"),
        Cell::from_text("A1"),
    ]];
    for (time, reading) in times.iter().zip(readings) {
        rows.push(vec![
            Cell::Missing,
            Cell::Number(f64::from(*time)),
            Cell::Number(*reading),
        ]);
    }
    rows
}

proptest! {
    /// Inverting a response generated from the curve recovers the input
    /// concentration.
    #[test]
    fn inversion_round_trips(
        slope in prop::num::f64::NORMAL.prop_filter("nonzero", |m| m.abs() > 1e-6 && m.abs() < 1e6),
        intercept in -1e6f64..1e6,
        concentration in -1e6f64..1e6,
    ) {
        let curve = CalibrationCurve::new(slope, intercept);
        let response = slope * concentration + intercept;
        let recovered = curve.invert(response).unwrap();
        prop_assert!((recovered - concentration).abs() <= 1e-6 * concentration.abs().max(1.0));
    }

    /// Recovered time axes are strictly ascending regardless of input order.
    #[test]
    fn times_are_strictly_ascending(times in prop::collection::vec(0u32..10_000, 1..50)) {
        let readings: Vec<f64> = times.iter().map(|t| f64::from(*t)).collect();
        let rows = block_rows(&times, &readings);
        let series = parse_rows(&rows, "prop").unwrap();
        prop_assert!(series.times().windows(2).all(|pair| pair[0] < pair[1]));

        // The deduplicated, sorted timestamps are exactly the series axis.
        let mut seen = std::collections::HashSet::new();
        let expected: Vec<f64> = {
            let mut firsts: Vec<f64> = rows[1..]
                .iter()
                .filter_map(|row| parse_minutes(&row[1]))
                .filter(|t| seen.insert(t.to_bits()))
                .collect();
            firsts.sort_by(f64::total_cmp);
            firsts
        };
        prop_assert_eq!(series.times(), expected.as_slice());
    }

    /// Appending an identical copy of a block changes nothing.
    #[test]
    fn reimporting_a_block_is_idempotent(times in prop::collection::vec(0u32..10_000, 1..30)) {
        let readings: Vec<f64> = times.iter().map(|t| f64::from(*t) * 2.0).collect();
        let once_rows = block_rows(&times, &readings);
        let once = parse_rows(&once_rows, "prop").unwrap();

        let mut doubled = once_rows.clone();
        doubled.push(vec![Cell::Missing]);
        doubled.extend(once_rows);
        let twice = parse_rows(&doubled, "prop").unwrap();

        prop_assert_eq!(once, twice);
    }

    /// Arbitrary text never panics the time parser, and accepted values are
    /// finite and non-negative.
    #[test]
    fn time_parsing_is_total(text in ".{0,20}") {
        if let Some(minutes) = parse_minutes(&Cell::from_text(&text)) {
            prop_assert!(minutes.is_finite());
            prop_assert!(minutes >= 0.0);
        }
    }
}
