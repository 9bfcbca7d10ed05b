#![no_main]

use libfuzzer_sys::fuzz_target;
use lumiquant::ingest::parse_rows;
use lumiquant::table::read_delimited;

// Arbitrary bytes through CSV decoding and the block scanner must never panic.
fuzz_target!(|data: &[u8]| {
    if let Ok(rows) = read_delimited(data) {
        let _ = parse_rows(&rows, "fuzz");
    }
});
